//! Conversions between Diesel rows and domain types.
//!
//! Decoding goes back through the domain constructors so a row that no
//! longer satisfies an invariant surfaces as an error string instead of an
//! invalid value. Callers wrap the string in their port's query error.

use uuid::Uuid;

use crate::domain::{
    Address, AddressParts, AvatarUrl, Credits, DeadlineBucket, DisplayName, EmailAddress,
    OrderId, OrderRequest, OrderStatus, PhoneNumber, ProfessionalProfile, RatingSummary,
    RegionCode, Review, ReviewComment, Role, ServiceCategory, Stars, User, UserId,
};

use super::models::{OrderRow, ProfileRow, ReviewRow, UserRow};

pub(super) fn to_db_amount(amount: u32, column: &str) -> Result<i32, String> {
    i32::try_from(amount).map_err(|_| format!("{column} {amount} exceeds the column range"))
}

fn from_db_amount(amount: i32, column: &str) -> Result<u32, String> {
    u32::try_from(amount).map_err(|_| format!("{column} must not be negative, found {amount}"))
}

pub(super) fn row_to_user(row: &UserRow) -> Result<User, String> {
    let display_name = DisplayName::new(row.display_name.as_str())
        .map_err(|err| format!("user {}: {err}", row.id))?;
    let email = EmailAddress::new(&row.email).map_err(|err| format!("user {}: {err}", row.id))?;
    let role = row
        .role
        .parse::<Role>()
        .map_err(|err| format!("user {}: {err}", row.id))?;
    let avatar = row
        .avatar_url
        .as_deref()
        .map(AvatarUrl::new)
        .transpose()
        .map_err(|err| format!("user {}: {err}", row.id))?;
    Ok(User::new(UserId::from_uuid(row.id), display_name, email, role).with_avatar(avatar))
}

pub(super) fn profile_to_row(profile: &ProfessionalProfile) -> Result<ProfileRow, String> {
    Ok(ProfileRow {
        user_id: *profile.user_id.as_uuid(),
        description: profile.description.clone(),
        categories: profile
            .categories
            .iter()
            .map(|category| category.as_ref().to_owned())
            .collect(),
        region: profile.region.map(|region| region.code().to_owned()),
        phone: profile.phone.as_ref().map(|phone| phone.digits().to_owned()),
        credits: to_db_amount(profile.credits.get(), "credits")?,
        completed_jobs: to_db_amount(profile.completed_jobs, "completed_jobs")?,
        rating_total: to_db_amount(profile.rating.total(), "rating_total")?,
        rating_count: to_db_amount(profile.rating.count(), "rating_count")?,
    })
}

pub(super) fn row_to_profile(row: ProfileRow) -> Result<ProfessionalProfile, String> {
    let context = |err: &dyn std::fmt::Display| format!("profile {}: {err}", row.user_id);
    let categories = row
        .categories
        .iter()
        .map(ServiceCategory::new)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| context(&err))?;
    let region = row
        .region
        .as_deref()
        .map(str::parse::<RegionCode>)
        .transpose()
        .map_err(|err| context(&err))?;
    let phone = row
        .phone
        .as_deref()
        .map(PhoneNumber::new)
        .transpose()
        .map_err(|err| context(&err))?;
    Ok(ProfessionalProfile {
        user_id: UserId::from_uuid(row.user_id),
        description: row.description,
        categories,
        region,
        phone,
        credits: Credits::new(from_db_amount(row.credits, "credits")?),
        completed_jobs: from_db_amount(row.completed_jobs, "completed_jobs")?,
        rating: RatingSummary::new(
            from_db_amount(row.rating_total, "rating_total")?,
            from_db_amount(row.rating_count, "rating_count")?,
        ),
    })
}

pub(super) fn order_to_row(order: &OrderRequest) -> Result<OrderRow, String> {
    let address = &order.address;
    Ok(OrderRow {
        id: *order.id.as_uuid(),
        client_id: *order.client_id.as_uuid(),
        category: order.category.as_ref().to_owned(),
        description: order.description.clone(),
        postal_code: address.postal_code.digits().to_owned(),
        street: address.street.clone(),
        number: address.number.clone(),
        complement: address.complement.clone(),
        neighborhood: address.neighborhood.clone(),
        city: address.city.clone(),
        region: address.region.code().to_owned(),
        contact_phone: order.contact_phone.digits().to_owned(),
        deadline: order.deadline.as_str().to_owned(),
        status: order.status.as_str().to_owned(),
        lead_price: to_db_amount(order.lead_price.get(), "lead_price")?,
        created_at: order.created_at,
        expires_at: order.expires_at(),
    })
}

/// Rebuild an order from its row and the ids of professionals who unlocked
/// it, in unlock order.
pub(super) fn row_to_order(row: OrderRow, unlocked_by: Vec<Uuid>) -> Result<OrderRequest, String> {
    let context = |err: &dyn std::fmt::Display| format!("order {}: {err}", row.id);
    let address = Address::try_from_parts(AddressParts {
        postal_code: &row.postal_code,
        street: &row.street,
        number: &row.number,
        complement: row.complement.as_deref(),
        neighborhood: &row.neighborhood,
        city: &row.city,
        region: &row.region,
    })
    .map_err(|err| context(&err))?;
    let category = ServiceCategory::new(&row.category).map_err(|err| context(&err))?;
    let contact_phone = PhoneNumber::new(&row.contact_phone).map_err(|err| context(&err))?;
    let deadline = row
        .deadline
        .parse::<DeadlineBucket>()
        .map_err(|err| context(&err))?;
    let status = row
        .status
        .parse::<OrderStatus>()
        .map_err(|err| context(&err))?;
    Ok(OrderRequest {
        id: OrderId::from_uuid(row.id),
        client_id: UserId::from_uuid(row.client_id),
        category,
        description: row.description,
        address,
        contact_phone,
        deadline,
        status,
        created_at: row.created_at,
        lead_price: Credits::new(from_db_amount(row.lead_price, "lead_price")?),
        unlocked_by: unlocked_by.into_iter().map(UserId::from_uuid).collect(),
    })
}

pub(super) fn review_to_row(review: &Review) -> ReviewRow {
    ReviewRow {
        id: review.id,
        professional_id: *review.professional_id.as_uuid(),
        client_id: *review.client_id.as_uuid(),
        stars: i16::from(review.stars.get()),
        comment: review.comment.as_ref().to_owned(),
        created_at: review.created_at,
    }
}

pub(super) fn row_to_review(row: ReviewRow) -> Result<Review, String> {
    let stars = u8::try_from(row.stars)
        .map_err(|_| format!("review {}: stars {} out of range", row.id, row.stars))
        .and_then(|raw| Stars::new(raw).map_err(|err| format!("review {}: {err}", row.id)))?;
    let comment =
        ReviewComment::new(&row.comment).map_err(|err| format!("review {}: {err}", row.id))?;
    Ok(Review {
        id: row.id,
        professional_id: UserId::from_uuid(row.professional_id),
        client_id: UserId::from_uuid(row.client_id),
        stars,
        comment,
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::clock::fixture_time;
    use crate::test_support::fixtures;
    use rstest::rstest;

    #[rstest]
    fn orders_survive_a_row_round_trip() {
        let client = UserId::random();
        let order = fixtures::open_order(&client, "encanador", 12, fixture_time());
        let row = order_to_row(&order).expect("row");
        assert_eq!(row.expires_at, order.expires_at());
        assert_eq!(row.status, "OPEN");

        let professional = UserId::random();
        let restored = row_to_order(row, vec![*professional.as_uuid()]).expect("order");
        assert_eq!(restored.address, order.address);
        assert_eq!(restored.unlocked_by, vec![professional]);
        assert_eq!(restored.lead_price, Credits::new(12));
    }

    #[rstest]
    fn empty_profiles_keep_optional_columns_null() {
        let profile = ProfessionalProfile::empty(UserId::random(), Credits::new(3));
        let row = profile_to_row(&profile).expect("row");
        assert!(row.region.is_none());
        assert!(row.phone.is_none());
        assert_eq!(row_to_profile(row).expect("profile"), profile);
    }

    #[rstest]
    fn negative_balances_are_rejected() {
        let mut row = profile_to_row(&ProfessionalProfile::empty(UserId::random(), Credits::ZERO))
            .expect("row");
        row.credits = -1;
        let err = row_to_profile(row).expect_err("negative");
        assert!(err.contains("credits"));
    }

    #[rstest]
    #[case("CLIENT", Role::Client)]
    #[case("PROFESSIONAL", Role::Professional)]
    #[case("ADMIN", Role::Admin)]
    fn stored_roles_decode(#[case] stored: &str, #[case] expected: Role) {
        let row = UserRow {
            id: Uuid::new_v4(),
            email: "ana@example.com".into(),
            display_name: "Ana Souza".into(),
            role: stored.into(),
            avatar_url: None,
            password_hash: "$argon2id$stub".into(),
            created_at: fixture_time(),
        };
        assert_eq!(row_to_user(&row).expect("user").role(), expected);
    }

    #[rstest]
    fn out_of_range_stars_are_rejected() {
        let row = ReviewRow {
            id: Uuid::new_v4(),
            professional_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            stars: 9,
            comment: String::new(),
            created_at: fixture_time(),
        };
        assert!(row_to_review(row).is_err());
    }
}
