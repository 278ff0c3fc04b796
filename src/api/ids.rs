//! Submission identifiers: `<prefix>_<unix millis>_<6 base36 chars>`.

use rand::Rng;

use crate::security::rate_limit::now_millis;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn generate_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}_{}_{}", prefix, now_millis(), suffix)
}
