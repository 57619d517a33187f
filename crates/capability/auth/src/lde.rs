use crate::{AuthError, EncodeError, LdeError, ParseError, SecretTable, Segment};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use domain::Reading;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Deserialize;
use sha2::{Sha256, Sha384, Sha512};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// 报文头，只关心签名算法。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnvelopeHeader {
    alg: String,
}

/// 绑定密钥表的 LDE 解码器，可在多个请求间共享。
#[derive(Debug, Clone)]
pub struct LdeCodec {
    secrets: Arc<SecretTable>,
}

impl LdeCodec {
    pub fn new(secrets: SecretTable) -> Self {
        Self {
            secrets: Arc::new(secrets),
        }
    }

    pub fn secrets(&self) -> &SecretTable {
        &self.secrets
    }

    /// 校验并解码一条推送报文。
    pub fn decode(&self, body: &[u8]) -> Result<Reading, LdeError> {
        decode_message(body, &self.secrets)
    }
}

/// 校验并解码一条推送报文。
///
/// 任一步骤失败都只返回错误，不返回部分解码的读数。
pub fn decode_message(body: &[u8], secrets: &SecretTable) -> Result<Reading, LdeError> {
    let body = normalize_alphabet(body);
    let segments: Vec<&[u8]> = body.split(|byte| *byte == b'.').collect();
    let [header_seg, payload_seg, signature_seg] = segments.as_slice() else {
        return Err(ParseError::SegmentCount(segments.len()).into());
    };

    let header_raw = decode_segment(header_seg, Segment::Header)?;
    let payload_raw = decode_segment(payload_seg, Segment::Payload)?;

    let reading: Reading = serde_json::from_slice(&payload_raw)
        .map_err(|err| ParseError::Payload(err.to_string()))?;
    if reading.device_id().is_empty() {
        return Err(ParseError::MissingDeviceId.into());
    }

    let header: EnvelopeHeader = serde_json::from_slice(&header_raw)
        .map_err(|err| ParseError::Header(err.to_string()))?;
    let algorithm = hmac_algorithm(&header.alg)?;

    // 设备 ID 此时尚未经过签名校验，仅用于选择密钥
    let secret = secrets
        .resolve(reading.device_id())
        .ok_or_else(|| AuthError::UnknownDevice(reading.device_id().to_string()))?;

    let signature = decode_segment(signature_seg, Segment::Signature)?;
    let signing_input = &body[..header_seg.len() + 1 + payload_seg.len()];
    verify_signature(algorithm, secret, signing_input, &signature)?;

    Ok(reading)
}

/// 使用 HS256 将读数签发为 LDE 报文。
pub fn encode_message(reading: &Reading, secret: &[u8]) -> Result<String, EncodeError> {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        reading,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|err| EncodeError(err.to_string()))
}

/// 设备可能发送标准 base64 字母表，统一改写为 URL 安全字母表。
fn normalize_alphabet(body: &[u8]) -> Vec<u8> {
    body.iter()
        .map(|byte| match byte {
            b'+' => b'-',
            b'/' => b'_',
            other => *other,
        })
        .collect()
}

/// 解码单个报文段，尾部填充可有可无。
fn decode_segment(segment: &[u8], which: Segment) -> Result<Vec<u8>, ParseError> {
    let trimmed = segment
        .iter()
        .rposition(|byte| *byte != b'=')
        .map_or(&segment[..0], |last| &segment[..=last]);
    URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|_| ParseError::Base64(which))
}

/// 只接受 HMAC-SHA 系列，防止算法降级（含 `none`）。
fn hmac_algorithm(alg: &str) -> Result<Algorithm, AuthError> {
    match alg.parse::<Algorithm>() {
        Ok(algorithm @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(algorithm),
        _ => Err(AuthError::UnsupportedAlgorithm(alg.to_string())),
    }
}

fn verify_signature(
    algorithm: Algorithm,
    secret: &[u8],
    signing_input: &[u8],
    signature: &[u8],
) -> Result<(), AuthError> {
    let expected = match algorithm {
        Algorithm::HS256 => hmac_digest::<Hmac<Sha256>>(secret, signing_input),
        Algorithm::HS384 => hmac_digest::<Hmac<Sha384>>(secret, signing_input),
        Algorithm::HS512 => hmac_digest::<Hmac<Sha512>>(secret, signing_input),
        other => return Err(AuthError::UnsupportedAlgorithm(format!("{other:?}"))),
    }
    .ok_or(AuthError::SignatureMismatch)?;

    if bool::from(expected.as_slice().ct_eq(signature)) {
        Ok(())
    } else {
        Err(AuthError::SignatureMismatch)
    }
}

fn hmac_digest<M: Mac + KeyInit>(secret: &[u8], input: &[u8]) -> Option<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(secret).ok()?;
    mac.update(input);
    Some(mac.finalize().into_bytes().to_vec())
}
