use super::*;
use crate::session::Role;

fn test_client() -> GroqClient {
    let base_url = Url::parse("http://localhost:9999").expect("valid url");
    GroqClient::from_parts(base_url, &LlmConfig::default(), "test-key")
}

#[test]
fn client_configuration() {
    let client = test_client();
    assert_eq!(client.model, "llama-3.3-70b-versatile");
    assert!((client.temperature - 0.6).abs() < f32::EPSILON);
    assert_eq!(client.max_tokens, 4096);
}

#[test]
fn messages_carry_system_history_and_user_in_order() {
    let history = vec![
        ChatTurn::new(Role::User, "show me shirts"),
        ChatTurn::new(Role::Assistant, "here are two shirts"),
    ];

    let messages = GroqClient::build_messages("you are an assistant", &history, "under 500?");

    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], "you are an assistant");
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "show me shirts");
    assert_eq!(messages[2]["role"], "assistant");
    assert_eq!(messages[3]["role"], "user");
    assert_eq!(messages[3]["content"], "under 500?");
}

#[test]
fn completion_response_parsing() {
    let response_json = r#"{
        "choices": [
            {"message": {"role": "assistant", "content": "Here is a shirt."}}
        ]
    }"#;

    let response: ChatCompletionResponse =
        serde_json::from_str(response_json).expect("should parse response");
    assert_eq!(response.choices.len(), 1);
    assert_eq!(response.choices[0].message.content, "Here is a shirt.");
}

#[test]
fn request_serialization() {
    let request = ChatCompletionRequest {
        model: "llama-3.3-70b-versatile",
        temperature: 0.6,
        max_tokens: 4096,
        messages: GroqClient::build_messages("system", &[], "hello"),
    };

    let json = serde_json::to_value(&request).expect("should serialize");
    assert_eq!(json["model"], "llama-3.3-70b-versatile");
    assert_eq!(json["max_tokens"], 4096);
    assert_eq!(json["messages"].as_array().map(Vec::len), Some(2));
}
