use rand::Rng;

/// Display identifier shown in the channel name and intro embed. Collisions
/// across guilds and time are acceptable; the record key is the channel id.
pub fn generate() -> String {
    format(rand::thread_rng().gen_range(0..=9999))
}

fn format(n: u16) -> String {
    format!("{n:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_low_values_with_zeros() {
        assert_eq!(format(7), "0007");
        assert_eq!(format(0), "0000");
        assert_eq!(format(42), "0042");
        assert_eq!(format(9999), "9999");
    }

    #[test]
    fn always_four_ascii_digits() {
        for _ in 0..10_000 {
            let id = generate();
            assert_eq!(id.len(), 4);
            assert!(id.bytes().all(|b| b.is_ascii_digit()), "bad id {id}");
        }
    }
}
