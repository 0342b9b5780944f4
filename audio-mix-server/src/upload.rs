use axum::extract::multipart::{Multipart, MultipartError};

use audio_mix_core::models::audio_models::FALLBACK_MEDIA_TYPE;
use audio_mix_core::{AudioInput, AudioRole, MixRequest};

/// Collect the `speech` and `music` parts of a multipart body.
///
/// Other fields are skipped. A part without a content type is recorded as
/// `application/octet-stream`; one without a file name is named after its
/// role. Completeness is not checked here.
pub async fn read_mix_request(mut multipart: Multipart) -> Result<MixRequest, MultipartError> {
    let mut request = MixRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(role) = field.name().and_then(AudioRole::from_field_name) else {
            continue;
        };
        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| role.field_name().to_string());
        let media_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string());

        let data = field.bytes().await?;
        log::debug!("Received {} part {:?} ({}, {} bytes)", role, file_name, media_type, data.len());

        request.insert(AudioInput::new(role, file_name, media_type, data.to_vec()));
    }

    Ok(request)
}
