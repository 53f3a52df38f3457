// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Some helper mathematics.


use marlu::{c64, AzEl, UVW};

use crate::constants::{PI, TAU};

/// Complex exponential. The argument is assumed to be purely imaginary.
///
/// This function doesn't actually use complex numbers; it just returns the real
/// and imag components from Euler's formula (i.e. e^{ix} = cos{x} + i sin{x}).
///
/// # Examples
///
/// `assert_abs_diff_eq!(cexp(PI), c64::new(-1.0, 0.0));`
#[inline]
pub(crate) fn cexp(x: f64) -> c64 {
    let (im, re) = x.sin_cos();
    c64::new(re, im)
}

/// Wrap an angle into the interval (-pi, pi] \[radians\].
pub(crate) fn wrap_angle(x: f64) -> f64 {
    let wrapped = (x + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}

/// The East, North and Up components of the unit vector pointing at `azel`.
/// The components are packed into a [`UVW`] so that they can be dotted with
/// zenith-phased baselines.
pub(crate) fn azel_to_enu(azel: AzEl) -> UVW {
    let (s_el, c_el) = azel.el.sin_cos();
    let (s_az, c_az) = azel.az.sin_cos();
    UVW {
        u: c_el * s_az,
        v: c_el * c_az,
        w: s_el,
    }
}

#[inline]
pub(crate) fn dot(a: UVW, b: UVW) -> f64 {
    a.u * b.u + a.v * b.v + a.w * b.w
}
