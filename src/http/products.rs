//! Product route handlers.
//!
//! Writes normally arrive as `multipart/form-data` with `name`, `description`
//! and an `image` file. Text-only edits may also be sent url-encoded or as
//! JSON; those bodies never carry an image. The name may also be sent as
//! `name_products`.
//!
//! Extractor rejections are turned into [`Error::InvalidRequest`] so they
//! are answered with the envelope like every other failure.

use crate::{
    core::ProductInput,
    errors::{Error, Result},
    http::{
        AppState,
        envelope::{Envelope, success},
    },
    models::{ImageUpload, ProductView},
};
use axum::{
    Form, Json,
    extract::{FromRequest, Multipart, Path, Request, State, rejection::PathRejection},
    http::{StatusCode, header::CONTENT_TYPE},
};
use serde::Deserialize;

type ApiResult<T> = Result<Json<Envelope<T>>>;
type IdParam = std::result::Result<Path<i64>, PathRejection>;

pub async fn list_products(State(state): State<AppState>) -> ApiResult<Vec<ProductView>> {
    let products = state.products.list().await?;
    Ok(success("Product List", products))
}

pub async fn create_product(
    State(state): State<AppState>,
    request: Request,
) -> ApiResult<ProductView> {
    let input = read_product_request(request).await?;
    let product = state.products.create(input).await?;
    Ok(success("Product created successfully.", product))
}

pub async fn show_product(
    State(state): State<AppState>,
    id: IdParam,
) -> ApiResult<ProductView> {
    let product = state.products.show(product_id(id)?).await?;
    Ok(success("Product retrieved successfully.", product))
}

pub async fn update_product(
    State(state): State<AppState>,
    id: IdParam,
    request: Request,
) -> ApiResult<ProductView> {
    let id = product_id(id)?;
    let input = read_product_request(request).await?;
    let product = state.products.update(id, input).await?;
    Ok(success("Product updated successfully.", product))
}

pub async fn destroy_product(
    State(state): State<AppState>,
    id: IdParam,
) -> ApiResult<ProductView> {
    let product = state.products.destroy(product_id(id)?).await?;
    Ok(success("Product deleted successfully.", product))
}

fn invalid_request(status: StatusCode, message: String) -> Error {
    Error::InvalidRequest {
        status: status.as_u16(),
        message,
    }
}

fn product_id(id: IdParam) -> Result<i64> {
    id.map(|Path(id)| id)
        .map_err(|rejection| invalid_request(rejection.status(), rejection.body_text()))
}

/// Text fields of a url-encoded or JSON product body
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProductTextFields {
    #[serde(alias = "name_products")]
    name: String,
    description: String,
}

impl From<ProductTextFields> for ProductInput {
    fn from(fields: ProductTextFields) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            image: None,
        }
    }
}

/// Reads the product fields from whichever body format the request declares.
///
/// A request without a content type is treated as an empty form, so
/// validation reports the missing fields. Unknown content types get 415.
async fn read_product_request(request: Request) -> Result<ProductInput> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_ascii_lowercase);

    match content_type.as_deref() {
        None => Ok(ProductInput::default()),
        Some(mime) if mime.starts_with("multipart/form-data") => {
            let multipart = Multipart::from_request(request, &())
                .await
                .map_err(|rejection| invalid_request(rejection.status(), rejection.body_text()))?;
            read_product_form(multipart).await
        }
        Some(mime) if mime.starts_with("application/x-www-form-urlencoded") => {
            let Form(fields) = Form::<ProductTextFields>::from_request(request, &())
                .await
                .map_err(|rejection| invalid_request(rejection.status(), rejection.body_text()))?;
            Ok(fields.into())
        }
        Some(mime) if mime.starts_with("application/json") => {
            let Json(fields) = Json::<ProductTextFields>::from_request(request, &())
                .await
                .map_err(|rejection| invalid_request(rejection.status(), rejection.body_text()))?;
            Ok(fields.into())
        }
        Some(other) => Err(invalid_request(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("Unsupported content type '{other}'"),
        )),
    }
}

/// Collects the product fields from a multipart body.
///
/// Unknown fields are ignored. An `image` part without a file name or with
/// an empty body counts as no image, the way browsers send an untouched file input.
/// Body-limit overruns surface here as 413.
async fn read_product_form(mut multipart: Multipart) -> Result<ProductInput> {
    let multipart_error =
        |e: axum::extract::multipart::MultipartError| invalid_request(e.status(), e.body_text());
    let mut input = ProductInput::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(field_name) = field.name().map(ToString::to_string) else {
            continue;
        };
        match field_name.as_str() {
            "name" | "name_products" => {
                input.name = field.text().await.map_err(multipart_error)?;
            }
            "description" => {
                input.description = field.text().await.map_err(multipart_error)?;
            }
            "image" => {
                let file_name = field.file_name().map(ToString::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                input.image = file_name
                    .filter(|name| !name.is_empty() && !bytes.is_empty())
                    .map(|name| ImageUpload::from_file_name(bytes.to_vec(), &name));
            }
            other => tracing::debug!("Ignoring unexpected form field '{}'", other),
        }
    }

    Ok(input)
}
