//! Turn orchestrator: commands, classification, session bookkeeping.

mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use agent_relay::bot::AgentBot;
use agent_relay::config::{RelayConfig, ReplyTexts, DEFAULT_MEDIA_HOST};
use agent_relay::error::RelayError;
use agent_relay::types::{ContextKind, ReplyOutcome, Role, TurnContext};
use common::{finished_output, msg, usage, ScriptedTransport};

fn bot_with(transport: &Arc<ScriptedTransport>, config: &RelayConfig) -> AgentBot {
    AgentBot::new(transport.clone(), config)
}

fn bot(transport: &Arc<ScriptedTransport>) -> AgentBot {
    bot_with(transport, &RelayConfig::default())
}

#[tokio::test]
async fn greeting_on_fresh_session() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.queue_data(vec![msg("你"), msg("好"), finished_output("你好呀")]);
    let bot = bot(&transport);

    let reply = bot.reply(&TurnContext::text("user-1", "你好")).await;

    assert_eq!(reply, ReplyOutcome::Text("你好呀".into()));
    assert_eq!(transport.conversations_created(), 1);
    assert_eq!(transport.requests_created(), 1);

    let session = bot.sessions().get("user-1").expect("session exists");
    let session = session.lock().await;
    let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
    assert_eq!(session.messages()[1].content, "你好呀");
}

#[tokio::test]
async fn reported_total_tokens_accumulate() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.queue_data(vec![msg("a"), usage(2, 10)]);
    transport.queue_data(vec![msg("b"), usage(3, 15)]);
    let bot = bot(&transport);

    bot.reply(&TurnContext::text("k", "one")).await;
    bot.reply(&TurnContext::text("k", "two")).await;

    let session = bot.sessions().get_or_create("k");
    assert_eq!(session.lock().await.total_tokens(), 25);
    assert_eq!(transport.conversations_created(), 1);
}

#[tokio::test]
async fn clear_command_resets_without_network() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.queue_data(vec![msg("hi")]);
    let bot = bot(&transport);
    bot.reply(&TurnContext::text("k", "hello")).await;
    let calls_before = transport.network_calls();

    let reply = bot.reply(&TurnContext::text("k", "#清除记忆")).await;

    assert_eq!(reply, ReplyOutcome::Info(ReplyTexts::default().memory_cleared));
    assert_eq!(transport.network_calls(), calls_before);
    let session = bot.sessions().get_or_create("k");
    let session = session.lock().await;
    assert!(session.conversation_handle().is_none());
    assert!(session.messages().is_empty());
}

#[tokio::test]
async fn cleared_session_creates_a_new_conversation() {
    let transport = Arc::new(ScriptedTransport::new());
    let bot = bot(&transport);

    bot.reply(&TurnContext::text("k", "one")).await;
    bot.reply(&TurnContext::text("k", "#清除记忆")).await;
    bot.reply(&TurnContext::text("k", "two")).await;

    assert_eq!(transport.conversations_created(), 2);
}

#[tokio::test]
async fn configured_clear_commands_are_exact_matches() {
    let transport = Arc::new(ScriptedTransport::new());
    let mut config = RelayConfig::default();
    config.commands.clear_memory_commands = vec!["/reset".into(), "/forget".into()];
    let bot = bot_with(&transport, &config);

    let reply = bot.reply(&TurnContext::text("k", "/forget")).await;
    assert_eq!(reply.kind().to_string(), "info");
    assert_eq!(transport.network_calls(), 0);

    bot.reply(&TurnContext::text("k", "/forget please")).await;
    assert_eq!(transport.conversations_created(), 1);
}

#[tokio::test]
async fn clear_all_drops_every_session() {
    let transport = Arc::new(ScriptedTransport::new());
    let bot = bot(&transport);
    bot.reply(&TurnContext::text("a", "x")).await;
    bot.reply(&TurnContext::text("b", "y")).await;
    let calls_before = transport.network_calls();

    let reply = bot.reply(&TurnContext::text("a", "#清除所有")).await;

    assert_eq!(reply, ReplyOutcome::Info(ReplyTexts::default().all_memory_cleared));
    assert!(bot.sessions().is_empty());
    assert_eq!(transport.network_calls(), calls_before);
}

#[tokio::test]
async fn non_text_context_is_rejected() {
    let transport = Arc::new(ScriptedTransport::new());
    let bot = bot(&transport);
    let context = TurnContext::builder()
        .session_key("k")
        .content("voice.amr")
        .kind(ContextKind::Voice)
        .build();

    let reply = bot.reply(&context).await;

    assert_eq!(reply, ReplyOutcome::Error("Bot不支持处理VOICE类型的消息".into()));
    assert_eq!(transport.network_calls(), 0);
    assert!(bot.sessions().is_empty());
}

#[tokio::test]
async fn video_payload_becomes_video_link() {
    let transport = Arc::new(ScriptedTransport::new());
    let payload = r#"["SUCCESS", [{"url": "https://cdn.test/cogvideo/clip.mp4"}]]"#;
    transport.queue_data(vec![finished_output(payload), usage(5, 9)]);
    let bot = bot(&transport);

    let reply = bot.reply(&TurnContext::text("k", "make a video")).await;

    assert_eq!(reply, ReplyOutcome::VideoUrl("https://cdn.test/cogvideo/clip.mp4".into()));
}

#[tokio::test]
async fn media_host_png_becomes_image_link() {
    let transport = Arc::new(ScriptedTransport::new());
    let url = format!("{DEFAULT_MEDIA_HOST}/out/cat.png");
    transport.queue_data(vec![msg(&url)]);
    let bot = bot(&transport);

    let reply = bot.reply(&TurnContext::text("k", "draw a cat")).await;

    assert_eq!(reply, ReplyOutcome::ImageUrl(url));
    let session = bot.sessions().get_or_create("k");
    assert_eq!(session.lock().await.messages().len(), 1);
}

#[tokio::test]
async fn zero_completion_tokens_with_text_is_error() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.queue_data(vec![usage(0, 0), msg("content filtered")]);
    let bot = bot(&transport);

    let reply = bot.reply(&TurnContext::text("k", "hi")).await;

    assert_eq!(reply, ReplyOutcome::Error("content filtered".into()));
    let session = bot.sessions().get_or_create("k");
    assert_eq!(session.lock().await.total_tokens(), 0);
}

#[tokio::test]
async fn conversation_create_failing_every_attempt_is_tired_error() {
    let transport = Arc::new(ScriptedTransport::new());
    for _ in 0..3 {
        transport.queue_conversation(Err(RelayError::api(500, "internal")));
    }
    let bot = bot_with(&transport, &common::test_config());

    let reply = bot.reply(&TurnContext::text("k", "hi")).await;

    assert_eq!(reply, ReplyOutcome::Error(ReplyTexts::default().exhausted));
    assert_eq!(transport.conversations_created(), 3);
}

#[tokio::test]
async fn empty_stream_apology_is_plain_text() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.queue_data(vec![]);
    let bot = bot(&transport);

    let reply = bot.reply(&TurnContext::text("k", "hi")).await;

    assert_eq!(reply, ReplyOutcome::Text(ReplyTexts::default().no_content));
}

#[tokio::test(start_paused = true)]
async fn concurrent_turns_on_one_session_create_one_conversation() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.delay_conversation_creation(Duration::from_secs(1));
    transport.queue_data(vec![msg("first")]);
    transport.queue_data(vec![msg("second")]);
    let bot = Arc::new(bot(&transport));

    let a = tokio::spawn({
        let bot = bot.clone();
        async move { bot.reply(&TurnContext::text("shared", "one")).await }
    });
    let b = tokio::spawn({
        let bot = bot.clone();
        async move { bot.reply(&TurnContext::text("shared", "two")).await }
    });
    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    assert_eq!(transport.conversations_created(), 1);
    assert_eq!(transport.requests_created(), 2);
    let mut texts = vec![a.payload().to_string(), b.payload().to_string()];
    texts.sort();
    assert_eq!(texts, vec!["first", "second"]);
}

#[tokio::test(start_paused = true)]
async fn different_sessions_run_independently() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.delay_conversation_creation(Duration::from_secs(1));
    let bot = Arc::new(bot(&transport));

    let started = tokio::time::Instant::now();
    let ctx_a = TurnContext::text("a", "x");
    let ctx_b = TurnContext::text("b", "y");
    let (a, b) = tokio::join!(bot.reply(&ctx_a), bot.reply(&ctx_b));

    assert_eq!(a.kind(), b.kind());
    assert_eq!(transport.conversations_created(), 2);
    assert!(started.elapsed() < Duration::from_secs(2));
}
