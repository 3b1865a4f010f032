use anyhow::Result;
use futures::StreamExt;
use ia_m_uv::ai::{GeminiClient, GeminiClientConfig, RequestOptions};
use ia_m_uv::cli;
use ia_m_uv::config::Config;
use std::io::Write;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PRO_MODEL: &str = "gemini-1.5-pro";
const SALES_PERSONA: &str = "You are a polite and helpful sales assistant.";
const MARKETING_INSTRUCTION: &str = "Answer in a fun, witty way with a marketing tone.";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ia_m_uv=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = cli::parse_args();
    let config = Config::from_env();

    info!("Starting ia-m-uv with model {}", config.gemini_model);

    let client_config = GeminiClientConfig::default().with_model(config.gemini_model.clone());
    let client = match GeminiClient::new(config.google_api_key.clone(), client_config.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to initialize Gemini client: {}", e);
            std::process::exit(1);
        }
    };

    println!("--- Default generation ---");
    match client
        .generate_response(&args.problem, RequestOptions::default())
        .await
    {
        Ok(reply) => println!("Reply: {}\n", reply),
        Err(e) => error!("Default generation failed: {}", e),
    }

    println!("--- Generation with model and temperature ---");
    match GeminiClient::new(
        config.google_api_key.clone(),
        GeminiClientConfig::default()
            .with_model(PRO_MODEL)
            .with_temperature(0.5),
    ) {
        Ok(pro_client) => match pro_client
            .generate_response(
                "Write a short story about an astronaut cat.",
                RequestOptions::default(),
            )
            .await
        {
            Ok(reply) => println!("Reply with {} (temperature 0.5): {}\n", PRO_MODEL, reply),
            Err(e) => error!("Generation with {} failed: {}", PRO_MODEL, e),
        },
        Err(e) => error!("Failed to initialize {} client: {}", PRO_MODEL, e),
    }

    println!("--- Instructed generation ---");
    match client
        .generate_response_instructed(
            "Create a slogan for a new lemon soda.",
            MARKETING_INSTRUCTION,
            RequestOptions::default(),
        )
        .await
    {
        Ok(reply) => println!("Reply: {}\n", reply),
        Err(e) => error!("Instructed generation failed: {}", e),
    }

    println!("--- Streaming generation ---");
    match client
        .generate_response_stream(&args.problem, RequestOptions::default())
        .await
    {
        Ok(mut chunks) => {
            while let Some(chunk) = chunks.next().await {
                match chunk {
                    Ok(text) => {
                        print!("{}", text);
                        std::io::stdout().flush()?;
                    }
                    Err(e) => {
                        error!("Stream interrupted: {}", e);
                        break;
                    }
                }
            }
            println!("\n");
        }
        Err(e) => error!("Streaming generation failed: {}", e),
    }

    println!("--- Chat session ---");
    let mut chat_client = match GeminiClient::new(
        config.google_api_key,
        client_config.with_system_instruction(SALES_PERSONA),
    ) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to initialize Gemini chat client: {}", e);
            std::process::exit(1);
        }
    };
    chat_client.start_chat(None);

    for message in [
        "Hello, I'm interested in a new smartphone.",
        "Which are the best options for photography?",
    ] {
        println!("Chat (user): {}", message);
        match chat_client.send_chat_message(message).await {
            Ok(reply) => println!("Chat (model): {}", reply),
            Err(e) => error!("Chat message failed: {}", e),
        }
    }

    Ok(())
}
