// Copyright 2021 A Veenstra.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0> or the
// MIT license <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your option. This file may not be copied,
// modified, or distributed except according to those terms.

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// This allows for dynamic switching between different types to use for the value indices.
pub trait Id:
'static + Default + Copy + Clone + Send + Sync +
Display + Debug + Hash +
Eq + Ord +
Add<Output=Self> + Sub<Output=Self> +
AddAssign + SubAssign
{
    /// The value used as a `dont_care` value.
    ///
    /// This is equal to the maximum value of the implementing type.
    fn dont_care() -> Self;

    /// Whether this is the `dont_care` value.
    #[inline(always)]
    fn is_dont_care(self) -> bool { self == Self::dont_care() }

    /// Convert to [usize].
    fn as_usize(self) -> usize;

    /// Convert from [usize].
    fn from_usize(other: usize) -> Self;

    /// The exclusive upper bound on the number of values a parameter may have for this type.
    ///
    /// The maximum of the type is reserved for [Id::dont_care].
    fn max_levels() -> usize;
}

macro_rules! as_id {
    ($t:ident, $($ts:ident),+) => { as_id!($t); as_id!($($ts),+); };
    ($t:ident) => {
        impl Id for $t {
            #[inline(always)]
            fn dont_care() -> Self { $t::MAX }
            #[inline(always)]
            fn as_usize(self) -> usize { self as usize }
            #[inline(always)]
            fn from_usize(other: usize) -> Self { other as $t }
            #[inline(always)]
            fn max_levels() -> usize { $t::MAX as usize }
        }
    };
}

as_id!(u8, u16, u32, u64, usize);
