#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_bean as bean;
pub use vc_bind as bind;
pub use vc_convert as convert;
pub use vc_utils as utils;

/// Commonly used items of every member crate.
pub mod prelude {
    pub use vc_bean::prelude::*;
    pub use vc_bind::prelude::*;
    pub use vc_convert::prelude::*;
}
