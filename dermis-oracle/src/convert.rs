use serde_json::{Value, json};

use crate::error::OracleError;
use crate::image::ImagePayload;
use crate::oracle::{OracleRequest, ResponseSchema};

/// Converts an image to an OpenRouter `image_url` content part.
fn image_to_json(image: &ImagePayload) -> Value {
    json!({
        "type": "image_url",
        "image_url": {
            "url": image.to_data_uri()
        }
    })
}

fn response_format_to_json(schema: &ResponseSchema) -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": schema.name,
            "strict": false,
            "schema": schema.schema
        }
    })
}

/// Builds the full OpenRouter API request body.
///
/// The request is a single user message: the instructions, then each image
/// in the order given.
pub fn build_request_body(request: &OracleRequest) -> Value {
    let mut content = vec![json!({
        "type": "text",
        "text": request.instructions
    })];
    content.extend(request.images.iter().map(image_to_json));

    let mut body = json!({
        "model": request.model,
        "messages": [{
            "role": "user",
            "content": content
        }]
    });

    if let Some(schema) = &request.response_schema {
        body["response_format"] = response_format_to_json(schema);
    }

    body
}

/// Extracts the reply text from an OpenRouter API response.
///
/// An empty reply is returned as an empty string; deciding what that means
/// is up to the caller.
pub fn extract_text(response: &Value) -> Result<String, OracleError> {
    // OpenRouter can report provider failures inside a 200 response.
    if let Some(error) = response.get("error") {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        let status = error
            .get("code")
            .and_then(|c| c.as_u64())
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(0);
        return Err(OracleError::Api { status, message });
    }

    let choice = response
        .get("choices")
        .and_then(|c| c.get(0))
        .ok_or_else(|| OracleError::MalformedResponse("No choices in response".to_string()))?;

    let msg = choice
        .get("message")
        .ok_or_else(|| OracleError::MalformedResponse("No message in choice".to_string()))?;

    let text = match msg.get("content") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join(""),
        _ => String::new(),
    };

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::analysis_response_schema;

    fn request(images: Vec<ImagePayload>, schema: Option<ResponseSchema>) -> OracleRequest {
        OracleRequest {
            model: "google/gemini-2.0-flash-001".to_string(),
            instructions: "Look closely.".to_string(),
            images,
            response_schema: schema,
        }
    }

    #[test]
    fn test_body_orders_text_then_images() {
        let first = ImagePayload::from_bytes("image/png", b"first");
        let second = ImagePayload::from_bytes("image/jpeg", b"second");
        let body = build_request_body(&request(vec![first.clone(), second.clone()], None));

        assert_eq!(body["model"], "google/gemini-2.0-flash-001");
        let content = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(content.len(), 3);
        assert_eq!(content[0]["text"], "Look closely.");
        assert_eq!(content[1]["image_url"]["url"], first.to_data_uri());
        assert_eq!(content[2]["image_url"]["url"], second.to_data_uri());
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_body_carries_schema() {
        let image = ImagePayload::from_bytes("image/png", b"img");
        let body = build_request_body(&request(vec![image], Some(analysis_response_schema())));

        let format = &body["response_format"];
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["name"], "skin_analysis");
        assert_eq!(
            format["json_schema"]["schema"]["required"],
            json!(["isSkin", "isHealthy"])
        );
    }

    #[test]
    fn test_extract_string_content() {
        let response = json!({
            "model": "google/gemini-2.0-flash-001",
            "choices": [{
                "message": { "role": "assistant", "content": "Looks better." },
                "finish_reason": "stop"
            }]
        });
        assert_eq!(extract_text(&response).unwrap(), "Looks better.");
    }

    #[test]
    fn test_extract_array_content() {
        let response = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": [{ "type": "text", "text": "{\"isSkin\":" }, { "type": "text", "text": " true}" }]
                }
            }]
        });
        assert_eq!(extract_text(&response).unwrap(), "{\"isSkin\": true}");
    }

    #[test]
    fn test_extract_null_content_is_empty() {
        let response = json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        });
        assert_eq!(extract_text(&response).unwrap(), "");
    }

    #[test]
    fn test_extract_no_choices() {
        let response = json!({ "choices": [] });
        assert!(matches!(
            extract_text(&response),
            Err(OracleError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_embedded_error() {
        let response = json!({
            "error": { "code": 429, "message": "Rate limit exceeded" }
        });
        match extract_text(&response) {
            Err(OracleError::Api { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit exceeded");
            }
            other => panic!("Expected API error, got {other:?}"),
        }
    }
}
