//! Per-attempt browser identity: user agent, session id, forwarded IPs and
//! the request signature.
//!
//! Everything here is a pure function of the supplied random source and
//! timestamp. None of the values are verified locally; they only need to
//! have the shape the upstream expects.

use md5::Md5;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Desktop browser user agents rotated across attempts.
pub const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Edge/120.0.0.0 Safari/537.36",
];

/// Identity used for every request of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_agent: &'static str,
    pub session_id: String,
    pub forwarded_for: String,
    pub real_ip: String,
}

impl Identity {
    /// Draws a fresh identity from `rng`. `now_ms` is the Unix time in
    /// milliseconds and feeds the session id.
    pub fn generate<R: Rng>(rng: &mut R, now_ms: i64) -> Self {
        Self {
            user_agent: random_user_agent(rng),
            session_id: random_session_id(rng, now_ms),
            forwarded_for: random_ipv4(rng),
            real_ip: random_ipv4(rng),
        }
    }
}

pub fn random_user_agent<R: Rng>(rng: &mut R) -> &'static str {
    USER_AGENTS[rng.random_range(0..USER_AGENTS.len())]
}

/// MD5 over `"{now_ms}_{n}"` with `n < 1_000_000`, as lowercase hex.
pub fn random_session_id<R: Rng>(rng: &mut R, now_ms: i64) -> String {
    let n: u32 = rng.random_range(0..1_000_000);
    format!("{:x}", Md5::digest(format!("{now_ms}_{n}").as_bytes()))
}

/// SHA-256 over `store_id ‖ deal_id ‖ timestamp ‖ salt`, where the salt is
/// 16 random bytes rendered as hex.
pub fn random_signature<R: Rng>(
    rng: &mut R,
    store_id: &str,
    deal_id: &str,
    timestamp_secs: i64,
) -> String {
    let salt = random_hex(rng, 16);
    let data = format!("{store_id}{deal_id}{timestamp_secs}{salt}");
    format!("{:x}", Sha256::digest(data.as_bytes()))
}

pub fn random_ipv4<R: Rng>(rng: &mut R) -> String {
    let octets: [u8; 4] = std::array::from_fn(|_| rng.random_range(0..255));
    format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3])
}

/// `len` random bytes as lowercase hex (`2 * len` characters).
pub fn random_hex<R: Rng>(rng: &mut R, len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes[..]);
    hex::encode(bytes)
}
