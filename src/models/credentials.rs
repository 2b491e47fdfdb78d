use rand::{RngCore, rngs::OsRng};

/// Fallback token used when a member has no department code.
pub const FALLBACK_DEPARTMENT: &str = "staff";

/// Default generated password length.
pub const DEFAULT_PASSWORD_LEN: usize = 16;

/// Password alphabet: mixed-case letters, digits and a fixed symbol set.
/// Satisfies the complexity rules of the integrated platforms by
/// construction, so no retry loop is needed.
const PASSWORD_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%&*";

/// Lowercase and strip every character outside `[a-z0-9]`.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Derive the deterministic mailbox local part for a member.
///
/// `surname.firstname_department`, all lowercased with non-alphanumerics
/// stripped. The compensating-delete path relies on this being a pure
/// function of its inputs: recomputing it always yields the same value.
pub fn local_part(first_name: &str, last_name: &str, department_code: &str) -> String {
    let dept = normalize(department_code);
    let dept = if dept.is_empty() {
        FALLBACK_DEPARTMENT
    } else {
        &dept
    };
    format!(
        "{}.{}_{}",
        normalize(last_name),
        normalize(first_name),
        dept
    )
}

/// Generate a random password of `len` characters from the fixed alphabet,
/// sourced from the OS CSPRNG.
pub fn generate_password(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .into_iter()
        .map(|b| PASSWORD_ALPHABET[b as usize % PASSWORD_ALPHABET.len()] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("John", "O'Doe", "Sales & Support", "doe.john_salessupport")]
    #[case("John", "Doe", "sales", "doe.john_sales")]
    #[case(" Mary Jane ", "dos Santos", "IT", "dossantos.maryjane_it")]
    #[case("John", "Doe", "", "doe.john_staff")]
    #[case("John", "Doe", "---", "doe.john_staff")]
    fn derives_local_part(
        #[case] first: &str,
        #[case] last: &str,
        #[case] dept: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(local_part(first, last, dept), expected);
    }

    #[test]
    fn local_part_is_deterministic() {
        let a = local_part("John", "Doe", "sales");
        let b = local_part("John", "Doe", "sales");
        assert_eq!(a, b);
    }

    #[test]
    fn password_has_requested_length_and_alphabet() {
        for len in [1, 16, 64] {
            let pw = generate_password(len);
            assert_eq!(pw.len(), len);
            assert!(
                pw.bytes().all(|b| PASSWORD_ALPHABET.contains(&b)),
                "unexpected character in {pw}"
            );
        }
    }

    #[test]
    fn passwords_differ_between_calls() {
        // 69^16 possibilities; a collision here means the RNG is broken.
        assert_ne!(generate_password(16), generate_password(16));
    }
}
