//! Directory, own-profile and review handlers.
//!
//! ```text
//! GET  /api/v1/professionals?category=eletricista&region=SP&minRating=4&q=joao
//! GET  /api/v1/professionals/me
//! PUT  /api/v1/professionals/me
//! GET  /api/v1/professionals/{id}
//! POST /api/v1/professionals/{id}/reviews {"stars":5,"comment":"Pontual"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{OwnProfile, ProfessionalPage, ReviewView};
use crate::domain::{
    DirectoryFilter, DirectoryFilterError, Error, ProfessionalCard, ProfileDetails,
    ProfileValidationError, RegionCode, ReviewComment, Stars,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, invalid_value_error, missing_field_error, out_of_range_error,
    parse_user_id,
};

const CATEGORY: FieldName = FieldName::new("category");
const CATEGORIES: FieldName = FieldName::new("categories");
const REGION: FieldName = FieldName::new("region");
const MIN_RATING: FieldName = FieldName::new("minRating");
const DESCRIPTION: FieldName = FieldName::new("description");
const PHONE: FieldName = FieldName::new("phone");
const PROFESSIONAL_ID: FieldName = FieldName::new("professionalId");
const STARS: FieldName = FieldName::new("stars");
const COMMENT: FieldName = FieldName::new("comment");

/// Query string for the directory search. Blank values are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DirectoryParams {
    pub category: Option<String>,
    /// Brazilian state code such as `SP`.
    pub region: Option<String>,
    /// Minimum average rating, 0 to 5.
    pub min_rating: Option<String>,
    /// Case and accent insensitive match on name or description.
    pub q: Option<String>,
}

impl TryFrom<&DirectoryParams> for DirectoryFilter {
    type Error = Error;

    fn try_from(params: &DirectoryParams) -> Result<Self, Self::Error> {
        let min_rating = params
            .min_rating
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                raw.parse::<f64>()
                    .map_err(|_| invalid_value_error(MIN_RATING, raw, "minRating must be a number"))
            })
            .transpose()?;
        Self::try_new(
            params.category.as_deref(),
            params.region.as_deref(),
            min_rating,
            params.q.as_deref(),
        )
        .map_err(|err| match err {
            DirectoryFilterError::Category(_) => invalid_field_error(CATEGORY, err),
            DirectoryFilterError::UnknownRegion => invalid_field_error(REGION, err),
            DirectoryFilterError::RatingOutOfRange { .. } => out_of_range_error(MIN_RATING, err),
        })
    }
}

/// Body for `PUT /api/v1/professionals/me`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[serde(default)]
    pub description: String,
    pub categories: Vec<String>,
    pub region: Option<String>,
    pub phone: Option<String>,
}

fn map_profile_error(err: ProfileValidationError) -> Error {
    let field = match err {
        ProfileValidationError::InvalidCategory
        | ProfileValidationError::NoCategories
        | ProfileValidationError::TooManyCategories { .. } => CATEGORIES,
        ProfileValidationError::InvalidPhone => PHONE,
        ProfileValidationError::DescriptionTooLong { .. } => DESCRIPTION,
    };
    invalid_field_error(field, err)
}

impl TryFrom<ProfileRequest> for ProfileDetails {
    type Error = Error;

    fn try_from(value: ProfileRequest) -> Result<Self, Self::Error> {
        let raw_region = value.region.ok_or_else(|| missing_field_error(REGION))?;
        let region = raw_region
            .parse::<RegionCode>()
            .map_err(|err| invalid_value_error(REGION, &raw_region, err))?;
        let phone = value.phone.ok_or_else(|| missing_field_error(PHONE))?;
        Self::try_new(&value.description, &value.categories, region, &phone)
            .map_err(map_profile_error)
    }
}

/// Body for `POST /api/v1/professionals/{id}/reviews`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub stars: i64,
    #[serde(default)]
    pub comment: String,
}

impl ReviewRequest {
    fn parse(&self) -> Result<(Stars, ReviewComment), Error> {
        let stars = u8::try_from(self.stars)
            .ok()
            .and_then(|value| Stars::new(value).ok())
            .ok_or_else(|| out_of_range_error(STARS, "stars must be between 1 and 5"))?;
        let comment =
            ReviewComment::new(&self.comment).map_err(|err| invalid_field_error(COMMENT, err))?;
        Ok((stars, comment))
    }
}

/// Search the public directory.
///
/// Results are sorted by rating, then completed jobs, then name. Credit
/// balances are never included.
#[utoipa::path(
    get,
    path = "/api/v1/professionals",
    params(DirectoryParams),
    responses(
        (status = 200, description = "Matching professionals", body = [ProfessionalCard]),
        (status = 400, description = "Invalid filter", body = Error)
    ),
    tags = ["professionals"],
    operation_id = "searchProfessionals",
    security([])
)]
#[get("/professionals")]
pub async fn search_professionals(
    state: web::Data<HttpState>,
    params: web::Query<DirectoryParams>,
) -> ApiResult<web::Json<Vec<ProfessionalCard>>> {
    let filter = DirectoryFilter::try_from(&params.into_inner())?;
    Ok(web::Json(state.directory.search(&filter).await?))
}

/// The authenticated professional's own profile, including credits.
#[utoipa::path(
    get,
    path = "/api/v1/professionals/me",
    responses(
        (status = 200, description = "Own profile", body = OwnProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a professional", body = Error)
    ),
    tags = ["professionals"],
    operation_id = "ownProfile"
)]
#[get("/professionals/me")]
pub async fn own_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<OwnProfile>> {
    let user_id = session.require_user_id()?;
    Ok(web::Json(state.directory.own_profile(&user_id).await?))
}

/// Replace the editable part of the authenticated professional's profile.
#[utoipa::path(
    put,
    path = "/api/v1/professionals/me",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = OwnProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a professional", body = Error)
    ),
    tags = ["professionals"],
    operation_id = "updateOwnProfile"
)]
#[put("/professionals/me")]
pub async fn update_own_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<OwnProfile>> {
    let user_id = session.require_user_id()?;
    let details = ProfileDetails::try_from(payload.into_inner())?;
    Ok(web::Json(
        state.profiles.update_profile(&user_id, details).await?,
    ))
}

/// Public profile page with reviews, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/professionals/{id}",
    params(("id" = String, Path, description = "Professional user id")),
    responses(
        (status = 200, description = "Profile page", body = ProfessionalPage),
        (status = 400, description = "Invalid id", body = Error),
        (status = 404, description = "Unknown or unlisted professional", body = Error)
    ),
    tags = ["professionals"],
    operation_id = "professionalProfile",
    security([])
)]
#[get("/professionals/{id}")]
pub async fn professional_profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfessionalPage>> {
    let professional = parse_user_id(&path, PROFESSIONAL_ID)?;
    Ok(web::Json(state.directory.profile(&professional).await?))
}

/// Review a professional who unlocked one of the client's orders.
#[utoipa::path(
    post,
    path = "/api/v1/professionals/{id}/reviews",
    params(("id" = String, Path, description = "Professional user id")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review recorded", body = ReviewView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an engaged client", body = Error),
        (status = 404, description = "Unknown professional", body = Error),
        (status = 409, description = "Already reviewed", body = Error)
    ),
    tags = ["professionals"],
    operation_id = "submitReview"
)]
#[post("/professionals/{id}/reviews")]
pub async fn submit_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let client = session.require_user_id()?;
    let professional = parse_user_id(&path, PROFESSIONAL_ID)?;
    let (stars, comment) = payload.parse()?;
    let review = state
        .reviews
        .submit_review(&client, &professional, stars, comment)
        .await?;
    Ok(HttpResponse::Created().json(review))
}

#[cfg(test)]
mod tests;
