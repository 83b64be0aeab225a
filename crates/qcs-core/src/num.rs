// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Solver Numeric Trait
//!
//! Durations, completion times, lower bounds and objectives are all generic
//! integers. `SolverNumeric` collects the bounds the engines rely on into a
//! single alias so generic signatures stay readable.
//!
//! Integer arithmetic keeps the makespan exact: the average-load term of the
//! lower bound is rounded up with [`div_ceil_non_negative`], which stays a
//! valid bound because every achievable makespan is integral.

use num_traits::{FromPrimitive, PrimInt, Signed};
use std::hash::Hash;

/// Signed primitive integers usable as time values in the solvers
/// (`i8`, `i16`, `i32`, `i64`, `isize`, `i128`).
pub trait SolverNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + std::fmt::Debug
    + std::fmt::Display
    + std::iter::Sum
    + Hash
    + Send
    + Sync
    + 'static
{
}

impl<T> SolverNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + std::fmt::Debug
        + std::fmt::Display
        + std::iter::Sum
        + Hash
        + Send
        + Sync
        + 'static
{
}

/// Computes `ceil(numerator / denominator)` for a non-negative numerator and
/// a positive denominator.
///
/// # Panics
///
/// In debug builds, panics if `numerator` is negative or `denominator` is not
/// positive.
///
/// # Examples
///
/// ```rust
/// use qcs_core::num::div_ceil_non_negative;
///
/// assert_eq!(div_ceil_non_negative(73i64, 2), 37);
/// assert_eq!(div_ceil_non_negative(72i64, 2), 36);
/// assert_eq!(div_ceil_non_negative(0i64, 3), 0);
/// ```
#[inline]
pub fn div_ceil_non_negative<T>(numerator: T, denominator: T) -> T
where
    T: PrimInt + Signed,
{
    debug_assert!(
        !numerator.is_negative(),
        "called `div_ceil_non_negative` with a negative numerator"
    );
    debug_assert!(
        denominator.is_positive(),
        "called `div_ceil_non_negative` with a non-positive denominator"
    );

    let quotient = numerator / denominator;
    if quotient * denominator < numerator {
        quotient + T::one()
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_solver_numeric<T: SolverNumeric>() {}

    #[test]
    fn test_signed_primitives_are_solver_numeric() {
        assert_solver_numeric::<i32>();
        assert_solver_numeric::<i64>();
        assert_solver_numeric::<isize>();
    }

    #[test]
    fn test_div_ceil_exact_division() {
        assert_eq!(div_ceil_non_negative(12i64, 4), 3);
        assert_eq!(div_ceil_non_negative(0i32, 5), 0);
    }

    #[test]
    fn test_div_ceil_rounds_up() {
        assert_eq!(div_ceil_non_negative(13i64, 4), 4);
        assert_eq!(div_ceil_non_negative(1i32, 7), 1);
        assert_eq!(div_ceil_non_negative(73i64, 2), 37);
    }

    #[test]
    fn test_div_ceil_near_type_bounds_does_not_overflow() {
        assert_eq!(div_ceil_non_negative(i64::MAX, 1), i64::MAX);
        assert_eq!(div_ceil_non_negative(i64::MAX, 2), i64::MAX / 2 + 1);
    }
}
