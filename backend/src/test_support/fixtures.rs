//! Builders for valid domain values.

use chrono::{DateTime, Utc};

use crate::domain::{
    Address, AddressParts, Credits, DeadlineBucket, DisplayName, EmailAddress, NewOrder,
    OrderRequest, PhoneNumber, ProfessionalProfile, ProfileDetails, RegionCode, Role,
    ServiceCategory, User, UserId,
};

/// User with a fresh id and an e-mail derived from `slug`.
pub fn user(role: Role, display_name: &str, slug: &str) -> User {
    User::new(
        UserId::random(),
        DisplayName::new(display_name).expect("fixture display name"),
        EmailAddress::new(format!("{slug}@example.com")).expect("fixture email"),
        role,
    )
}

/// Listed profile offering `category` in `region`.
pub fn listed_profile(
    user_id: &UserId,
    category: &str,
    region: RegionCode,
    credits: u32,
) -> ProfessionalProfile {
    let mut profile = ProfessionalProfile::empty(user_id.clone(), Credits::new(credits));
    profile.apply(
        ProfileDetails::try_new(
            "Atendimento residencial com garantia",
            [category],
            region,
            "11987654321",
        )
        .expect("fixture profile details"),
    );
    profile
}

/// Address on Avenida Paulista, São Paulo.
pub fn address() -> Address {
    Address::try_from_parts(AddressParts {
        postal_code: "01310-100",
        street: "Avenida Paulista",
        number: "1578",
        complement: Some("conjunto 12"),
        neighborhood: "Bela Vista",
        city: "São Paulo",
        region: "SP",
    })
    .expect("fixture address")
}

/// Order content for `category` with the given deadline.
pub fn new_order(category: &str, deadline: DeadlineBucket) -> NewOrder {
    NewOrder {
        category: ServiceCategory::new(category).expect("fixture category"),
        description: "Instalar tomadas novas na cozinha e revisar o quadro".into(),
        address: address(),
        contact_phone: PhoneNumber::new("11912345678").expect("fixture phone"),
        deadline,
    }
}

/// Open order by `client` priced at `price` credits.
pub fn open_order(client: &UserId, category: &str, price: u32, at: DateTime<Utc>) -> OrderRequest {
    OrderRequest::open(
        client.clone(),
        new_order(category, DeadlineBucket::ThisWeek),
        Credits::new(price),
        at,
    )
}
