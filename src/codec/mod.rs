//! The two canonical plaintext encodings the gateway accepts.

pub mod api;
pub mod hosted_form;
