//! Integration tests for the index and ask stages
//!
//! OpenAI and Pinecone are both replaced by wiremock servers; the real
//! clients run against them.

use docquarry::config::EmbeddingConfig;
use docquarry::embedding::index_documents;
use docquarry::index::PineconeClient;
use docquarry::llm::OpenAiClient;
use docquarry::retrieval::Retriever;
use docquarry::{QuarryError, ScrapedDocument};
use futures::StreamExt;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn documents() -> Vec<ScrapedDocument> {
    vec![
        ScrapedDocument {
            url: "https://da.live/docs".to_string(),
            title: "Overview".to_string(),
            content: "DA is a document authoring tool".to_string(),
            images: vec!["https://da.live/docs/img/a.png".to_string()],
            videos: vec![],
        },
        ScrapedDocument {
            url: "https://da.live/docs/sub".to_string(),
            title: "Sub".to_string(),
            content: "Sub page".to_string(),
            images: vec![],
            videos: vec!["https://youtu.be/xyz".to_string()],
        },
    ]
}

async fn mount_embeddings(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "data": [{"object": "embedding", "index": 0, "embedding": [0.25, 0.5]}],
            "model": "text-embedding-3-small"
        })))
        .mount(server)
        .await;
}

async fn mount_query(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_partial_json(serde_json::json!({"topK": 3, "includeMetadata": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "matches": [
                {
                    "id": "https://da.live/docs",
                    "score": 0.92,
                    "metadata": {
                        "url": "https://da.live/docs",
                        "title": "Overview",
                        "content": "DA is a document authoring tool",
                        "images": [],
                        "youtube_links": []
                    }
                },
                {
                    "id": "https://da.live/docs/sub",
                    "score": 0.41,
                    "metadata": {"url": "https://da.live/docs/sub", "title": "Sub", "content": "Sub page"}
                }
            ],
            "namespace": ""
        })))
        .mount(server)
        .await;
}

fn openai(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new("sk-test")
        .with_base_url(server.uri())
        .with_completion_model("gpt-4o-mini")
}

fn pinecone(server: &MockServer) -> PineconeClient {
    PineconeClient::new("pc-test")
        .with_control_plane_url(server.uri())
        .with_ready_polling(2, Duration::ZERO)
}

#[tokio::test]
async fn test_index_creates_index_and_upserts_every_document() {
    let openai_server = MockServer::start().await;
    let pinecone_server = MockServer::start().await;
    let host = pinecone_server.uri();

    mount_embeddings(&openai_server).await;

    Mock::given(method("GET"))
        .and(path("/indexes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"indexes": []})),
        )
        .mount(&pinecone_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/indexes"))
        .and(body_partial_json(serde_json::json!({
            "name": "docs",
            "dimension": 1536,
            "metric": "cosine"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "name": "docs", "host": host, "status": {"ready": false}
        })))
        .expect(1)
        .mount(&pinecone_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/indexes/docs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "docs", "host": host, "status": {"ready": true}
        })))
        .mount(&pinecone_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/vectors/upsert"))
        .and(header("api-key", "pc-test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"upsertedCount": 1})),
        )
        .expect(2)
        .mount(&pinecone_server)
        .await;

    let index = pinecone(&pinecone_server)
        .ensure_index("docs", &EmbeddingConfig::default())
        .await
        .unwrap();
    let count = index_documents(&documents(), &openai(&openai_server), &index)
        .await
        .unwrap();

    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_index_stops_on_embedding_failure() {
    let openai_server = MockServer::start().await;
    let pinecone_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&openai_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/vectors/upsert"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&pinecone_server)
        .await;

    let index = pinecone(&pinecone_server).index(&pinecone_server.uri());
    let err = index_documents(&documents(), &openai(&openai_server), &index)
        .await
        .unwrap_err();

    assert!(matches!(err, QuarryError::Llm(_)));
}

#[tokio::test]
async fn test_ask_answers_from_retrieved_context() {
    let openai_server = MockServer::start().await;
    let pinecone_server = MockServer::start().await;

    mount_embeddings(&openai_server).await;
    mount_query(&pinecone_server).await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({"model": "gpt-4o-mini"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "See https://da.live/docs"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 50, "completion_tokens": 5, "total_tokens": 55}
        })))
        .expect(1)
        .mount(&openai_server)
        .await;

    let openai = openai(&openai_server);
    let index = pinecone(&pinecone_server).index(&pinecone_server.uri());
    let retriever = Retriever::new(&openai, &index, &openai, 3);

    let answer = retriever.ask("What is DA?").await.unwrap();
    assert_eq!(answer.text, "See https://da.live/docs");
    assert_eq!(
        answer.sources,
        vec!["https://da.live/docs", "https://da.live/docs/sub"]
    );

    // The prompt is sent as one user message carrying both matches
    let requests = openai_server.received_requests().await.unwrap();
    let chat = requests
        .iter()
        .find(|r| r.url.path() == "/chat/completions")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&chat.body).unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    let prompt = messages[0]["content"].as_str().unwrap();
    assert!(prompt.contains("Overview\nURL: https://da.live/docs\nContent: DA is a document authoring tool\n\n"));
    assert!(prompt.contains("Sub\nURL: https://da.live/docs/sub\nContent: Sub page\n\n"));
    assert!(prompt.contains("Question: What is DA?"));
}

#[tokio::test]
async fn test_ask_stream_yields_tokens() {
    let openai_server = MockServer::start().await;
    let pinecone_server = MockServer::start().await;

    mount_embeddings(&openai_server).await;
    mount_query(&pinecone_server).await;

    let sse = concat!(
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Use \"}}]}\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"DA.\"}}]}\n\n",
        "data: [DONE]\n\n"
    );
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse),
        )
        .mount(&openai_server)
        .await;

    let openai = openai(&openai_server);
    let index = pinecone(&pinecone_server).index(&pinecone_server.uri());
    let retriever = Retriever::new(&openai, &index, &openai, 3);

    let mut answer = retriever.ask_stream("What is DA?").await.unwrap();
    let mut text = String::new();
    while let Some(chunk) = answer.chunks.next().await {
        let chunk = chunk.unwrap();
        if chunk.done {
            break;
        }
        text.push_str(&chunk.delta);
    }

    assert_eq!(text, "Use DA.");
    assert_eq!(answer.sources.len(), 2);
}
