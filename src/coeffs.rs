/*
 Copyright (c) 2023 clone206

 This file is part of noisegen

 noisegen is free software: you can redistribute it and/or modify it
 under the terms of the GNU General Public License as published by the
 Free Software Foundation, either version 3 of the License, or
 (at your option) any later version.

 noisegen is distributed in the hope that it will be useful, but
 WITHOUT ANY WARRANTY; without even the implied warranty of
 MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 GNU General Public License for more details.
 You should have received a copy of the GNU General Public License
 along with noisegen. If not, see <https://www.gnu.org/licenses/>.
*/

// Generated by `fir_design --taps 63 --scale 30 --shift 24`.
// Inverse-sinc pre-equalizer for a zero-order-hold DAC.

use crate::byte_tables::CoefficientVector;

pub const FIR_SHIFT: u32 = 24;

#[rustfmt::skip]
pub const FIR_COEFFS: CoefficientVector = [
        -177713,
         189748,
        -203048,
         217797,
        -234212,
         252555,
        -273139,
         296345,
        -322638,
         352589,
        -386911,
         426496,
        -472477,
         526310,
        -589886,
         665707,
        -757125,
         868728,
       -1006914,
        1180835,
       -1403936,
        1696618,
       -2091039,
        2640255,
       -3436827,
        4653956,
       -6646377,
       10234323,
      -17670370,
       37022271,
     -114897984,
     1252281111,
     -114897984,
       37022271,
      -17670370,
       10234323,
       -6646377,
        4653956,
       -3436827,
        2640255,
       -2091039,
        1696618,
       -1403936,
        1180835,
       -1006914,
         868728,
        -757125,
         665707,
        -589886,
         526310,
        -472477,
         426496,
        -386911,
         352589,
        -322638,
         296345,
        -273139,
         252555,
        -234212,
         217797,
        -203048,
         189748,
        -177713,
              0,
];
