/// Pending verification codes are stored under the bare phone number.
pub fn verification_code_key(phone_number: &str) -> String {
    phone_number.trim().to_string()
}
