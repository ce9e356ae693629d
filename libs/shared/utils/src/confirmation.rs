use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const CONFIRMATION_LENGTH: usize = 8;

/// Random booking reference such as `K3Q9ZB7A`.
pub fn generate_confirmation_number() -> String {
    let mut rng = rand::thread_rng();
    (0..CONFIRMATION_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

pub fn is_confirmation_number(value: &str) -> bool {
    value.len() == CONFIRMATION_LENGTH && value.bytes().all(|b| ALPHABET.contains(&b))
}
