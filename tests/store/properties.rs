use pfx_store::errors::ManifestError;
use pfx_store::manifest::parse_secrets;
use pfx_store::secrets::{
    secret_key, ConversionError, CredentialRecord, KeyMaterial, TLS_CERT_KEY, TLS_SECRET_TYPE,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn non_tls_types_are_rejected_before_fields(secret_type in "[A-Za-z0-9./_-]{0,40}") {
        prop_assume!(secret_type != TLS_SECRET_TYPE);

        let record = CredentialRecord::new(secret_type.clone());
        let err = KeyMaterial::from_record("ns/name", &record).err();

        let rejected = matches!(
            err,
            Some(ConversionError::UnknownSecretType { ref actual, .. }) if *actual == secret_type
        );
        prop_assert!(rejected, "unexpected result {:?}", err);
    }

    #[test]
    fn manifest_identity_matches_secret_key(
        namespace in "[a-z0-9]([a-z0-9-]{0,20}[a-z0-9])?",
        name in "[a-z0-9]([a-z0-9-]{0,20}[a-z0-9])?(\\.[a-z0-9]([a-z0-9-]{0,8}[a-z0-9])?){0,2}",
    ) {
        let manifest = format!(
            "kind: Secret\nmetadata:\n  name: \"{name}\"\n  namespace: \"{namespace}\"\n"
        );
        let secrets = parse_secrets(&manifest).unwrap();

        prop_assert_eq!(secrets.len(), 1);
        prop_assert_eq!(secrets[0].key(), secret_key(&namespace, &name));
    }

    #[test]
    fn names_with_path_separators_are_rejected(
        head in "[a-z0-9]{0,8}",
        separator in prop_oneof![Just("/"), Just("\\"), Just("/../")],
        tail in "[a-z0-9]{0,8}",
    ) {
        let name = format!("{head}{separator}{tail}");
        let manifest = serde_json::json!({
            "kind": "Secret",
            "metadata": { "name": name },
        })
        .to_string();

        let rejected = matches!(
            parse_secrets(&manifest),
            Err(ManifestError::InvalidName { field: "metadata.name", .. })
        );
        prop_assert!(rejected, "accepted name {:?}", name);
    }

    #[test]
    fn string_data_is_taken_verbatim(value in "[ -~]{1,64}") {
        let manifest = serde_json::json!({
            "kind": "Secret",
            "metadata": { "name": "s" },
            "stringData": { TLS_CERT_KEY: value.clone() },
        })
        .to_string();
        let secrets = parse_secrets(&manifest).unwrap();

        prop_assert_eq!(secrets[0].record.field(TLS_CERT_KEY), Some(value.as_bytes()));
    }
}
