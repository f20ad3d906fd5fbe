use arrow_quest_core::{LevelError, LevelId, Program};
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use thiserror::Error;

/// Leading segment naming the share code format.
const SHARE_DOMAIN: &str = "quest";
/// Format revision written after the domain.
const SHARE_VERSION: &str = "v1";
/// Delimiter used to separate the prefix, level and payload.
const FIELD_DELIMITER: char = ':';

/// Program paired with the level it was written for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ProgramShare {
    /// Level the program solves (or attempts to).
    pub(crate) level: LevelId,
    /// Directions in execution order.
    pub(crate) program: Program,
}

impl ProgramShare {
    /// Encodes the share into a single-line string suitable for pasting.
    pub(crate) fn encode(&self) -> Result<String, ProgramTransferError> {
        let json = serde_json::to_vec(&self.program).map_err(ProgramTransferError::Serialize)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        let level = self.level.get();
        Ok(format!(
            "{SHARE_DOMAIN}{FIELD_DELIMITER}{SHARE_VERSION}{FIELD_DELIMITER}\
             {level}{FIELD_DELIMITER}{encoded}"
        ))
    }

    /// Decodes a share from its string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, ProgramTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ProgramTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(ProgramTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(ProgramTransferError::MissingVersion)?;
        let level = parts.next().ok_or(ProgramTransferError::MissingLevel)?;
        let payload = parts.next().ok_or(ProgramTransferError::MissingPayload)?;
        if parts.next().is_some() {
            return Err(ProgramTransferError::TrailingSegments);
        }

        if domain != SHARE_DOMAIN {
            return Err(ProgramTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SHARE_VERSION {
            return Err(ProgramTransferError::UnsupportedVersion(version.to_owned()));
        }

        let level = parse_level(level)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(ProgramTransferError::InvalidEncoding)?;
        let program: Program =
            serde_json::from_slice(&bytes).map_err(ProgramTransferError::InvalidPayload)?;

        Ok(Self { level, program })
    }
}

/// Errors that can occur while encoding or decoding share codes.
#[derive(Debug, Error)]
pub(crate) enum ProgramTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("share code was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("share code is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("share code is missing the version")]
    MissingVersion,
    /// The level segment was missing.
    #[error("share code is missing the level")]
    MissingLevel,
    /// The payload segment was missing.
    #[error("share code is missing the payload")]
    MissingPayload,
    /// More segments followed the payload.
    #[error("share code has unexpected segments after the payload")]
    TrailingSegments,
    /// The prefix segment named another format.
    #[error("share prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The version segment named an unsupported revision.
    #[error("share version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The level segment was not a number.
    #[error("could not parse level '{0}'")]
    InvalidLevel(String),
    /// The level segment named a level that does not exist.
    #[error(transparent)]
    UnknownLevel(LevelError),
    /// The base64 payload could not be decoded.
    #[error("could not decode share payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload was not a program.
    #[error("could not parse share payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The program could not be serialised.
    #[error("could not serialise program: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn parse_level(level: &str) -> Result<LevelId, ProgramTransferError> {
    let index = level
        .trim()
        .parse::<usize>()
        .map_err(|_| ProgramTransferError::InvalidLevel(level.to_owned()))?;
    LevelId::new(index).map_err(ProgramTransferError::UnknownLevel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(level: usize, program: &str) -> ProgramShare {
        ProgramShare {
            level: LevelId::new(level).expect("level exists"),
            program: program.parse().expect("program parses"),
        }
    }

    #[test]
    fn round_trip_program() {
        let original = share(3, "RDDRRUU");

        let encoded = original.encode().expect("program encodes");
        assert!(encoded.starts_with("quest:v1:3:"), "{encoded}");

        let decoded = ProgramShare::decode(&encoded).expect("share decodes");
        assert_eq!(decoded, original);
    }

    #[test]
    fn encoder_writes_the_segments_the_decoder_checks() {
        let encoded = share(2, "DDRRU").encode().expect("program encodes");
        let segments: Vec<&str> = encoded.split(FIELD_DELIMITER).collect();

        assert_eq!(segments.len(), 4, "{encoded}");
        assert_eq!(segments[0], SHARE_DOMAIN);
        assert_eq!(segments[1], SHARE_VERSION);
        assert_eq!(segments[2], "2");
    }

    #[test]
    fn round_trip_empty_program() {
        let original = share(0, "");

        let encoded = original.encode().expect("program encodes");
        let decoded = ProgramShare::decode(&format!("  {encoded}\n")).expect("share decodes");

        assert_eq!(decoded, original);
    }

    #[test]
    fn rejects_foreign_prefix() {
        let encoded = share(1, "DR").encode().expect("program encodes");
        let foreign = encoded.replacen(SHARE_DOMAIN, "maze", 1);

        assert!(matches!(
            ProgramShare::decode(&foreign),
            Err(ProgramTransferError::InvalidPrefix(prefix)) if prefix == "maze"
        ));
    }

    #[test]
    fn rejects_unsupported_version() {
        let encoded = share(1, "DR").encode().expect("program encodes");
        let future = encoded.replacen("v1", "v2", 1);

        assert!(matches!(
            ProgramShare::decode(&future),
            Err(ProgramTransferError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn rejects_unknown_level() {
        let encoded = share(0, "DR").encode().expect("program encodes");
        let unknown = encoded.replacen(":0:", ":9:", 1);

        assert!(matches!(
            ProgramShare::decode(&unknown),
            Err(ProgramTransferError::UnknownLevel(_))
        ));
        assert!(matches!(
            ProgramShare::decode("quest:v1:two:e30"),
            Err(ProgramTransferError::InvalidLevel(_))
        ));
    }

    #[test]
    fn rejects_truncated_and_padded_codes() {
        assert!(matches!(
            ProgramShare::decode("   "),
            Err(ProgramTransferError::EmptyPayload)
        ));
        assert!(matches!(
            ProgramShare::decode("quest:v1:0"),
            Err(ProgramTransferError::MissingPayload)
        ));
        assert!(matches!(
            ProgramShare::decode("quest"),
            Err(ProgramTransferError::MissingVersion)
        ));
        assert!(matches!(
            ProgramShare::decode("quest:v1:0:e30:extra"),
            Err(ProgramTransferError::TrailingSegments)
        ));
    }

    #[test]
    fn rejects_corrupt_payloads() {
        assert!(matches!(
            ProgramShare::decode("quest:v1:0:***"),
            Err(ProgramTransferError::InvalidEncoding(_))
        ));

        let not_a_program = STANDARD_NO_PAD.encode(b"[1, 2, 3]");
        assert!(matches!(
            ProgramShare::decode(&format!("quest:v1:0:{not_a_program}")),
            Err(ProgramTransferError::InvalidPayload(_))
        ));
    }
}
