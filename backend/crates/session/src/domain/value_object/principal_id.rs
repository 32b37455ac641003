use kernel::id::ExternalId;

/// Principals are keyed by the external user store's 64-bit id.
pub type PrincipalId = ExternalId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_id_wire_form_is_string() {
        let id = PrincipalId::new(42);
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!("42"));
    }
}
