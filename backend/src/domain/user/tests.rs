//! Tests for user value objects.

use super::*;
use rstest::rstest;

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
fn user_id_rejects_bad_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
}

#[rstest]
#[case("Jo", UserValidationError::DisplayNameTooShort { min: DISPLAY_NAME_MIN })]
#[case("   ", UserValidationError::EmptyDisplayName)]
#[case("Bad<script>", UserValidationError::DisplayNameInvalidCharacters)]
fn display_name_rejects_bad_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(DisplayName::new(raw).expect_err("invalid name"), expected);
}

#[rstest]
#[case("João D'Ávila", "João D'Ávila")]
#[case("  Ana Paula  ", "Ana Paula")]
#[case("Oficina 24h", "Oficina 24h")]
fn display_name_accepts_accented_and_trims(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(DisplayName::new(raw).expect("valid name").as_ref(), expected);
}

#[rstest]
fn display_name_rejects_overlong_values() {
    let raw = "a".repeat(DISPLAY_NAME_MAX + 1);
    assert_eq!(
        DisplayName::new(raw).expect_err("too long"),
        UserValidationError::DisplayNameTooLong {
            max: DISPLAY_NAME_MAX
        }
    );
}

#[rstest]
#[case("  Maria@Example.COM ", Some("maria@example.com"))]
#[case("ana.silva+obra@mail.com.br", Some("ana.silva+obra@mail.com.br"))]
#[case("missing-at.example.com", None)]
#[case("a@b", None)]
fn email_normalises_and_validates(#[case] raw: &str, #[case] expected: Option<&str>) {
    let parsed = EmailAddress::new(raw).ok();
    assert_eq!(parsed.as_ref().map(AsRef::as_ref), expected);
}

#[rstest]
#[case("client", Role::Client)]
#[case("PROFESSIONAL", Role::Professional)]
#[case(" Admin ", Role::Admin)]
fn role_parses_case_insensitively(#[case] raw: &str, #[case] expected: Role) {
    assert_eq!(raw.parse::<Role>().expect("valid role"), expected);
}

#[rstest]
fn role_serialises_upper_case() {
    let value = serde_json::to_value(Role::Professional).expect("serialise role");
    assert_eq!(value, serde_json::json!("PROFESSIONAL"));
}

#[rstest]
#[case("https://cdn.example.com/avatars/1.png", true)]
#[case("ftp://cdn.example.com/a.png", false)]
#[case("avatars/1.png", false)]
fn avatar_url_accepts_http_only(#[case] raw: &str, #[case] ok: bool) {
    assert_eq!(AvatarUrl::new(raw).is_ok(), ok);
}

#[rstest]
fn user_serialises_camel_case_without_missing_avatar() {
    let user = User::new(
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("id"),
        DisplayName::new("Maria Souza").expect("name"),
        EmailAddress::new("maria@example.com").expect("email"),
        Role::Client,
    );
    let value = serde_json::to_value(&user).expect("serialise user");
    assert_eq!(
        value.get("displayName").and_then(|v| v.as_str()),
        Some("Maria Souza")
    );
    assert_eq!(value.get("role").and_then(|v| v.as_str()), Some("CLIENT"));
    assert!(value.get("avatar").is_none());
}
