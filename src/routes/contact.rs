use crate::{errors::ApiError, store::ContactStore};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ContactReq {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
}

#[derive(Serialize)]
pub struct ContactResp {
    pub success: bool,
    pub message: String,
}

pub async fn submit_contact(
    store: web::Data<ContactStore>,
    body: web::Json<ContactReq>,
) -> Result<HttpResponse, ApiError> {
    let (name, email, mobile) = match (
        non_empty(&body.name),
        non_empty(&body.email),
        non_empty(&body.mobile),
    ) {
        (Some(n), Some(e), Some(m)) => (n, e, m),
        _ => return Err(ApiError::BadRequest("All fields are required.".into())),
    };

    store.append_contact(name, email, mobile)?;
    Ok(HttpResponse::Created().json(ContactResp {
        success: true,
        message: "Contact saved.".into(),
    }))
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}
