//! Helper items to assist the working of `capdata`.

pub mod atom;
