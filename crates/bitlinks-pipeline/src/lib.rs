//! The bitlinks pipeline: cache check, validation, normalization, tagging,
//! three-way shortening and the final cache write.

pub mod error;
pub mod service;
pub mod validator;

pub use error::{PipelineError, Result};
pub use service::{Bitlinks, BitlinksService};
pub use validator::{HttpProbe, OriginPolicy, Probe, ProbeError, Validator};
