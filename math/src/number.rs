//! Minimal numeric identity traits, shared by `BigUint` and `BigInt`.

pub trait Zero {
    fn zero() -> Self;
    fn is_zero(&self) -> bool;
}

pub trait One {
    fn one() -> Self;
    fn is_one(&self) -> bool;
}

macro_rules! impl_num_type {
    ($name:ty) => {
        impl Zero for $name {
            fn zero() -> Self {
                0 as $name
            }
            fn is_zero(&self) -> bool {
                *self == 0
            }
        }

        impl One for $name {
            fn one() -> Self {
                1 as $name
            }
            fn is_one(&self) -> bool {
                *self == 1
            }
        }
    };
}

impl_num_type!(u32);
impl_num_type!(u64);
impl_num_type!(usize);
impl_num_type!(i64);
