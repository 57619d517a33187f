//! LDE 报文认证能力：密钥表、签名校验与解码。
//!
//! 报文格式为 `base64url(header).base64url(payload).base64url(signature)`，
//! 签名为 HS 系列 HMAC。签名密钥按载荷中的设备 ID 查找，因此载荷需在验签前解码。

mod lde;
mod secrets;

use std::fmt;

pub use lde::{LdeCodec, decode_message, encode_message};
pub use secrets::SecretTable;

/// 报文段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Header,
    Payload,
    Signature,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Segment::Header => "header",
            Segment::Payload => "payload",
            Segment::Signature => "signature",
        })
    }
}

/// 报文格式错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected 3 segments, found {0}")]
    SegmentCount(usize),
    #[error("invalid base64 in {0} segment")]
    Base64(Segment),
    #[error("invalid header json: {0}")]
    Header(String),
    #[error("invalid payload json: {0}")]
    Payload(String),
    #[error("missing Seneye device ID")]
    MissingDeviceId,
}

/// 认证失败。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("unknown Seneye device ID: {0:?}")]
    UnknownDevice(String),
    #[error("unexpected signing method: {0:?}")]
    UnsupportedAlgorithm(String),
    #[error("signature is invalid")]
    SignatureMismatch,
}

/// LDE 编解码错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LdeError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// 签发报文失败。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("encode failed: {0}")]
pub struct EncodeError(pub String);

impl LdeError {
    /// 错误类别（用于日志字段与计数标签）。
    pub fn kind(&self) -> &'static str {
        match self {
            LdeError::Parse(_) => "parse_error",
            LdeError::Auth(AuthError::UnknownDevice(_)) => "unknown_device",
            LdeError::Auth(AuthError::UnsupportedAlgorithm(_)) => "unsupported_algorithm",
            LdeError::Auth(AuthError::SignatureMismatch) => "signature_mismatch",
        }
    }
}
