//! Key credential types.
pub mod secp256k1;
