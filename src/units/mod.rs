// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to convert visibility amplitudes from flux-density units to
//! brightness-temperature units.


use log::{debug, warn};
use ndarray::prelude::*;
use thiserror::Error;

use crate::{
    beam::{BeamError, PspecBeam},
    pol::Polarisation,
    vis::{VisData, VisUnits},
};

#[derive(Error, Debug)]
pub enum UnitConversionError {
    #[error("The unit scale factors have {scales} values, but the visibilities have {freqs} frequencies")]
    DimensionMismatch { scales: usize, freqs: usize },

    #[error("Visibilities must be in {expected} to be converted, but they are in {got}")]
    BadUnits { expected: VisUnits, got: VisUnits },

    #[error(transparent)]
    Beam(#[from] BeamError),
}

/// Multiply every visibility by the scale factor of its frequency, regardless
/// of timestep, baseline or polarisation, and label the visibilities with
/// `new_units`.
pub fn scale_vis(
    vis: &mut VisData,
    scales: ArrayView1<f64>,
    new_units: VisUnits,
) -> Result<(), UnitConversionError> {
    if scales.len() != vis.num_freqs() {
        return Err(UnitConversionError::DimensionMismatch {
            scales: scales.len(),
            freqs: vis.num_freqs(),
        });
    }

    for (mut vis_tbp, &scale) in vis.vis_mut().axis_iter_mut(Axis(2)).zip(scales) {
        vis_tbp.mapv_inplace(|v| v * scale);
    }
    vis.set_units(new_units);
    Ok(())
}

/// Convert visibilities from Jy to mK with the beam's conversion factors for
/// polarisation `pol`. The same factors are applied to all polarisations in
/// the data; this is only accurate if the instrument's polarised responses
/// are the same. The scale factors are returned.
pub fn jy_to_mk(
    vis: &mut VisData,
    beam: &dyn PspecBeam,
    pol: Polarisation,
) -> Result<Array1<f64>, UnitConversionError> {
    if vis.units() != VisUnits::Jansky {
        return Err(UnitConversionError::BadUnits {
            expected: VisUnits::Jansky,
            got: vis.units(),
        });
    }
    if vis.pols().iter().any(|&p| p != pol) {
        warn!(
            "Using {pol} Jy to mK conversion factors for all polarisations ({})",
            vis.pols()
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let scales = beam.jy_to_mk(vis.freqs_hz(), pol)?;
    debug!(
        "Jy to mK factors range from {:.4e} to {:.4e}",
        scales.fold(f64::INFINITY, |a, &b| a.min(b)),
        scales.fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
    );
    scale_vis(vis, scales.view(), VisUnits::MilliKelvin)?;
    Ok(scales)
}
