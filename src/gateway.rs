//! Gateway: the event loop connecting channels to the orchestrator.

use crate::commands::{self, Command, CommandContext, CommandReplies};
use crate::orchestrator::Orchestrator;
use parley_core::{
    message::{IncomingMessage, MessageMetadata, OutgoingMessage},
    traits::Channel,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Routes messages between channels and the orchestrator.
pub struct Gateway {
    orchestrator: Arc<Orchestrator>,
    channels: HashMap<String, Arc<dyn Channel>>,
    replies: CommandReplies,
}

impl Gateway {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        channels: HashMap<String, Arc<dyn Channel>>,
        replies: CommandReplies,
    ) -> Self {
        Self {
            orchestrator,
            channels,
            replies,
        }
    }

    /// Run the main event loop until Ctrl-C or until every channel closes.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "Parley gateway running | provider: {} | channels: {}",
            self.orchestrator.provider_name(),
            self.channels.keys().cloned().collect::<Vec<_>>().join(", "),
        );

        let (tx, mut rx) = mpsc::channel::<IncomingMessage>(256);

        for (name, channel) in &self.channels {
            let mut channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
            let tx = tx.clone();
            let channel_name = name.clone();

            tokio::spawn(async move {
                while let Some(msg) = channel_rx.recv().await {
                    if tx.send(msg).await.is_err() {
                        info!("gateway receiver dropped, stopping {channel_name} forwarder");
                        break;
                    }
                }
            });

            info!("Channel started: {name}");
        }

        drop(tx);

        // One task per inbound message.
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                maybe = rx.recv() => {
                    let Some(incoming) = maybe else {
                        info!("all channels closed");
                        break;
                    };
                    let gw = self.clone();
                    in_flight.spawn(async move {
                        gw.handle_message(incoming).await;
                    });
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        error!("message task failed: {e}");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown(in_flight).await;
        Ok(())
    }

    /// Let in-flight messages finish, then stop all channels.
    async fn shutdown(&self, mut in_flight: JoinSet<()>) {
        info!("Shutting down ({} messages in flight)...", in_flight.len());

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!("message task failed: {e}");
            }
        }

        for (name, channel) in &self.channels {
            if let Err(e) = channel.stop().await {
                warn!("failed to stop channel {name}: {e}");
            }
        }

        info!(
            "Shutdown complete ({} users served this run).",
            self.orchestrator.sessions().user_count().await
        );
    }

    /// Process a single incoming message.
    pub(crate) async fn handle_message(&self, incoming: IncomingMessage) {
        info!(
            "[{}] {} says: {}",
            incoming.channel,
            incoming.sender_name.as_deref().unwrap_or("unknown"),
            incoming.preview()
        );

        if commands::is_command(&incoming.text) {
            match Command::parse(&incoming.text) {
                Some(cmd) => {
                    debug!("command {cmd:?} from {}", incoming.sender_id);
                    if cmd.needs_model() {
                        self.send_typing(&incoming).await;
                    }
                    let ctx = CommandContext {
                        orchestrator: &self.orchestrator,
                        replies: &self.replies,
                        sender_id: &incoming.sender_id,
                        text: &incoming.text,
                        today: chrono::Utc::now().date_naive(),
                    };
                    let reply = commands::handle(cmd, &ctx).await;
                    self.send_text(&incoming, &reply).await;
                }
                None => debug!("ignoring unknown command from {}", incoming.sender_id),
            }
            return;
        }

        if incoming.text.trim().is_empty() {
            return;
        }

        self.send_typing(&incoming).await;

        let reply = self
            .orchestrator
            .handle(&incoming.sender_id, &incoming.text)
            .await;

        let waited_ms = (chrono::Utc::now() - incoming.timestamp).num_milliseconds();
        debug!("message {} answered after {waited_ms}ms", incoming.id);

        self.send_text(&incoming, &reply).await;
    }

    /// Best-effort "typing" indicator in the sender's chat.
    async fn send_typing(&self, incoming: &IncomingMessage) {
        let Some(target) = incoming.reply_target.as_deref() else {
            return;
        };
        if let Some(channel) = self.channels.get(&incoming.channel) {
            if let Err(e) = channel.send_typing(target).await {
                debug!("typing indicator failed: {e}");
            }
        }
    }

    /// Send a plain text message back to the sender.
    async fn send_text(&self, incoming: &IncomingMessage, text: &str) {
        let msg = OutgoingMessage {
            text: text.to_string(),
            metadata: MessageMetadata::default(),
            reply_target: incoming.reply_target.clone(),
        };

        match self.channels.get(&incoming.channel) {
            Some(channel) => {
                if let Err(e) = channel.send(msg).await {
                    error!("failed to send message: {e}");
                }
            }
            None => warn!("no channel named {} to reply on", incoming.channel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parley_core::{
        config::TelegramConfig,
        context::{Context, Turn},
        error::ParleyError,
        traits::{Provider, Translator},
    };
    use parley_language::{HeuristicDetector, LanguagePipeline};
    use parley_memory::SessionStore;
    use std::sync::Mutex;

    /// A mock channel that replays queued messages and records what is sent.
    struct MockChannel {
        inbox: Mutex<Vec<IncomingMessage>>,
        sent: Arc<Mutex<Vec<OutgoingMessage>>>,
        typing: Arc<Mutex<Vec<String>>>,
        fail_send: bool,
    }

    impl MockChannel {
        fn new(inbox: Vec<IncomingMessage>) -> Self {
            Self {
                inbox: Mutex::new(inbox),
                sent: Arc::new(Mutex::new(Vec::new())),
                typing: Arc::new(Mutex::new(Vec::new())),
                fail_send: false,
            }
        }
    }

    #[async_trait]
    impl Channel for MockChannel {
        fn name(&self) -> &str {
            "mock"
        }

        async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, ParleyError> {
            let queued: Vec<IncomingMessage> = self.inbox.lock().unwrap().drain(..).collect();
            let (tx, rx) = mpsc::channel(queued.len().max(1));
            for msg in queued {
                tx.send(msg)
                    .await
                    .map_err(|e| ParleyError::Channel(e.to_string()))?;
            }
            Ok(rx)
        }

        async fn send(&self, message: OutgoingMessage) -> Result<(), ParleyError> {
            if self.fail_send {
                return Err(ParleyError::Channel("connection reset".to_string()));
            }
            self.sent.lock().unwrap().push(message);
            Ok(())
        }

        async fn send_typing(&self, target: &str) -> Result<(), ParleyError> {
            self.typing.lock().unwrap().push(target.to_string());
            Ok(())
        }

        async fn stop(&self) -> Result<(), ParleyError> {
            Ok(())
        }
    }

    struct EchoProvider {
        fail: bool,
    }

    #[async_trait]
    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        fn requires_api_key(&self) -> bool {
            false
        }

        async fn complete(&self, context: &Context) -> Result<OutgoingMessage, ParleyError> {
            if self.fail {
                return Err(ParleyError::Provider("openai request failed: timeout".into()));
            }
            let last = context.history.last().map(Turn::content).unwrap_or_default();
            Ok(OutgoingMessage {
                text: format!("You said: {last}"),
                ..Default::default()
            })
        }

        async fn is_available(&self) -> bool {
            true
        }
    }

    struct TagTranslator;

    #[async_trait]
    impl Translator for TagTranslator {
        fn name(&self) -> &str {
            "tag"
        }

        async fn translate(&self, text: &str, target: &str) -> Result<String, ParleyError> {
            Ok(format!("<{target}>{text}"))
        }
    }

    fn gateway(channel: Arc<MockChannel>, fail: bool) -> Arc<Gateway> {
        let language = LanguagePipeline::new(Arc::new(HeuristicDetector), Arc::new(TagTranslator));
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::new(EchoProvider { fail }),
            language,
            SessionStore::new(10),
        ));
        let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();
        channels.insert("mock".to_string(), channel);
        Arc::new(Gateway::new(
            orchestrator,
            channels,
            CommandReplies::from_config(&TelegramConfig::default()),
        ))
    }

    fn incoming(sender: &str, text: &str) -> IncomingMessage {
        let mut msg = IncomingMessage::new("mock", sender, text);
        msg.reply_target = Some(format!("chat-{sender}"));
        msg
    }

    #[tokio::test]
    async fn test_start_replies_with_welcome_and_keeps_no_state() {
        let channel = Arc::new(MockChannel::new(Vec::new()));
        let gw = gateway(channel.clone(), false);

        gw.handle_message(incoming("1", "/start")).await;

        {
            let sent = channel.sent.lock().unwrap();
            assert_eq!(sent.len(), 1);
            assert!(sent[0].text.starts_with("Welcome to your Astrology Bot!"));
            assert_eq!(sent[0].reply_target.as_deref(), Some("chat-1"));
        }
        assert_eq!(gw.orchestrator.sessions().user_count().await, 0);
    }

    #[tokio::test]
    async fn test_profile_and_forecast_commands() {
        let channel = Arc::new(MockChannel::new(Vec::new()));
        let gw = gateway(channel.clone(), false);

        gw.handle_message(incoming("2", "/SETINFO Ana, 1990-05-14, Lyon")).await;
        gw.handle_message(incoming("2", "/year")).await;

        {
            let sent = channel.sent.lock().unwrap();
            assert_eq!(sent.len(), 2);
            assert_eq!(sent[0].text, "Your details have been saved.");
            assert!(sent[1]
                .text
                .starts_with("You said: Annual forecast for the year "));
            assert!(sent[1].text.ends_with(" for 1990-05-14 in Lyon."));
        }
        // Only the forecast shows a typing indicator.
        assert_eq!(*channel.typing.lock().unwrap(), vec!["chat-2".to_string()]);
        assert_eq!(
            gw.orchestrator.sessions().snapshot("2").await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_unknown_command_is_ignored() {
        let channel = Arc::new(MockChannel::new(Vec::new()));
        let gw = gateway(channel.clone(), false);

        gw.handle_message(incoming("1", "/horoscope")).await;

        assert!(channel.sent.lock().unwrap().is_empty());
        assert_eq!(gw.orchestrator.sessions().user_count().await, 0);
    }

    #[tokio::test]
    async fn test_text_goes_through_orchestrator() {
        let channel = Arc::new(MockChannel::new(Vec::new()));
        let gw = gateway(channel.clone(), false);

        gw.handle_message(incoming("9", "Hello")).await;

        assert_eq!(*channel.typing.lock().unwrap(), vec!["chat-9".to_string()]);
        assert_eq!(channel.sent.lock().unwrap()[0].text, "You said: Hello");
        assert_eq!(
            gw.orchestrator.sessions().snapshot("9").await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_model_failure_sends_apology() {
        let channel = Arc::new(MockChannel::new(Vec::new()));
        let gw = gateway(channel.clone(), true);

        gw.handle_message(incoming("3", "Hello")).await;

        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.starts_with("Sorry, something went wrong: "));
        assert!(sent[0].text.contains("timeout"));
    }

    #[tokio::test]
    async fn test_send_failure_does_not_panic() {
        let mut channel = MockChannel::new(Vec::new());
        channel.fail_send = true;
        let gw = gateway(Arc::new(channel), false);
        gw.handle_message(incoming("4", "Hello")).await;
    }

    #[tokio::test]
    async fn test_run_drains_channel_and_stops() {
        let channel = Arc::new(MockChannel::new(vec![
            incoming("1", "/start"),
            incoming("2", "Hello"),
            incoming("3", "Hola, ¿cómo estás?"),
        ]));
        let gw = gateway(channel.clone(), false);

        gw.clone().run().await.unwrap();

        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), 3);
        let mut texts: Vec<&str> = sent.iter().map(|m| m.text.as_str()).collect();
        texts.sort_unstable();
        assert!(texts.contains(&"You said: Hello"));
        assert!(texts.contains(&"<es>You said: <en>Hola, ¿cómo estás?"));
        assert!(texts.iter().any(|t| t.starts_with("Welcome")));
    }
}
