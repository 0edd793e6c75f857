//! Protocol module containing the relay envelopes and the JSON codec.

pub mod codec;
pub mod frames;

pub use codec::{
    decode_inner_request, decode_request, encode_inner_response, encode_response,
    encode_response_text, DecodeError, EncodeError,
};
pub use frames::{ResponseOutcome, SkillRequestFrame, SkillResponseFrame};
