//! Event routing: workflow steps, the command table, document uploads.

use std::sync::Arc;

use ai_chat::{
    build_document_prompt, parse_report, ChatClient, MedicalReport, ReportError,
    REJECTION_PHRASE, SUPPORTED_EXTENSIONS,
};
use bot_core::{
    Callback, Command, DocumentRef, GatewayEvent, MenuMarkup, RecordKind, TextMessage,
    START_COMMAND,
};
use database::{
    count_users, create_user, delete_records_for_user, delete_user, get_user_by_chat_id,
    insert_record, list_records, Database, NewRecord, User, DEFAULT_HISTORY_LIMIT,
};
use session_registry::{Draft, MenuStack, Mode, Session, SessionRegistry};
use tracing::{error, info, warn};

use crate::document::DocumentExtractor;
use crate::error::{DispatchError, Result};
use crate::menus;
use crate::sender::ReplySender;
use crate::workflow::{advance_wizard, parse_pressure, parse_temperature, WizardStep};

const CONTACTS_TEXT: &str =
    "Для связи с администратором используйте телеграм - '@BrunoPewPew'";

const ABOUT_TEXT: &str = "Бот-помощник для расшифровки медицинских анализов. \
Загрузите pdf с результатами, и бот вернёт пояснения к показателям и рекомендации. \
Зарегистрированные пользователи могут также вести дневник температуры и давления.";

const UPLOAD_ACCEPTED_TEXT: &str = "Файл проверен и успешно загружен\n\
Операция может занять некоторое время, ожидайте ответа";

const DOCUMENT_ERROR_TEXT: &str = "Ошибка при обработке документа";

/// Routes every inbound event to the workflow state machine or the
/// command table, and turns the outcome into replies and persistence
/// calls.
///
/// Holds no per-conversation state of its own; everything mutable
/// lives in the [`SessionRegistry`] so overlapping handlers stay safe.
pub struct Dispatcher {
    db: Database,
    chat: Arc<ChatClient>,
    registry: Arc<SessionRegistry>,
    sender: Arc<dyn ReplySender>,
    extractor: Arc<dyn DocumentExtractor>,
}

impl Dispatcher {
    pub fn new(
        db: Database,
        chat: Arc<ChatClient>,
        registry: Arc<SessionRegistry>,
        sender: Arc<dyn ReplySender>,
        extractor: Arc<dyn DocumentExtractor>,
    ) -> Self {
        Self {
            db,
            chat,
            registry,
            sender,
            extractor,
        }
    }

    /// Handle one inbound event end to end.
    pub async fn handle_event(&self, event: GatewayEvent) -> Result<()> {
        if let Some(session) = self.registry.get(event.chat_id()).await {
            session.touch().await;
        }

        match event {
            GatewayEvent::Text(message) => self.handle_text(message).await,
            GatewayEvent::Callback(callback) => self.handle_callback(callback).await,
        }
    }

    async fn handle_text(&self, message: TextMessage) -> Result<()> {
        let chat_id = message.chat_id;

        // A session mid-collection consumes the text exclusively.
        if let Some(session) = self.registry.get(chat_id).await {
            let mode = session.mode().await;
            if mode.is_collecting() {
                return self.handle_workflow_text(&session, mode, &message.text).await;
            }
        }

        let first_token = message.text.split_whitespace().next().unwrap_or("");
        if first_token == START_COMMAND && message.document.is_none() {
            return self.send_start_menu(chat_id).await;
        }

        let Some(user) = get_user_by_chat_id(self.db.pool(), chat_id).await? else {
            // Unregistered free text carries no command; nothing to do.
            return Ok(());
        };

        match message.document {
            Some(document) => self.handle_document(chat_id, &user, &document).await,
            None => Ok(()),
        }
    }

    async fn handle_workflow_text(
        &self,
        session: &Session,
        mode: Mode,
        text: &str,
    ) -> Result<()> {
        let chat_id = session.chat_id();

        match mode {
            Mode::CollectingTemperature => {
                // One-shot entry: bad input is discarded, the mode
                // resets either way.
                session.set_mode(Mode::None).await;

                let Some(user) = get_user_by_chat_id(self.db.pool(), chat_id).await? else {
                    warn!(chat_id, "temperature entry without a registered user");
                    return Ok(());
                };

                if let Some(value) = parse_temperature(text) {
                    insert_record(
                        self.db.pool(),
                        &NewRecord {
                            user_id: user.id,
                            kind: RecordKind::Temperature,
                            recommendations: String::new(),
                            indicators: format!("t = {value}"),
                            info: RecordKind::Temperature.description().to_string(),
                        },
                    )
                    .await?;
                } else {
                    warn!(chat_id, text, "unreadable temperature, nothing recorded");
                }

                self.send_start_menu(chat_id).await
            }
            Mode::CollectingPressure => {
                let Some(indicators) = parse_pressure(text) else {
                    // Too many fields: stay in the mode, the user resends.
                    warn!(chat_id, text, "unreadable pressure input");
                    return Ok(());
                };

                let Some(user) = get_user_by_chat_id(self.db.pool(), chat_id).await? else {
                    warn!(chat_id, "pressure entry without a registered user");
                    session.set_mode(Mode::None).await;
                    return Ok(());
                };

                insert_record(
                    self.db.pool(),
                    &NewRecord {
                        user_id: user.id,
                        kind: RecordKind::Pressure,
                        recommendations: String::new(),
                        indicators,
                        info: RecordKind::Pressure.description().to_string(),
                    },
                )
                .await?;

                session.set_mode(Mode::None).await;
                self.send_start_menu(chat_id).await
            }
            wizard_mode => match advance_wizard(chat_id, wizard_mode, text) {
                WizardStep::Stall => Ok(()),
                WizardStep::Prompt { next, prompt } => {
                    session.set_mode(next).await;
                    self.sender.send_text(chat_id, prompt).await?;
                    Ok(())
                }
                WizardStep::Complete { user } => {
                    session.set_mode(Mode::None).await;
                    let created = create_user(self.db.pool(), &user).await?;
                    info!(chat_id, user_id = created.id, "user registered");
                    session.set_user(Some(created)).await;
                    self.sender.send_text(chat_id, "Вы зарегистрированы").await?;
                    self.send_start_menu(chat_id).await
                }
            },
        }
    }

    async fn handle_callback(&self, callback: Callback) -> Result<()> {
        let chat_id = callback.chat_id;

        let Some(session) = self.registry.get(chat_id).await else {
            warn!(chat_id, "callback for an inactive session, dropped");
            return Ok(());
        };

        self.sender
            .answer_callback(&callback.id, &format!("Вы выбрали: {}", callback.payload))
            .await?;

        let user = get_user_by_chat_id(self.db.pool(), chat_id).await?;

        let Some(command) = Command::parse(&callback.payload) else {
            let text = format!("'{}' - Нет такой команды", callback.payload);
            info!(chat_id, payload = %callback.payload, "unknown command");
            self.sender.send_text(chat_id, &text).await?;
            return Ok(());
        };

        match command {
            Command::Contacts => {
                self.sender.send_text(chat_id, CONTACTS_TEXT).await?;
                self.send_start_menu(chat_id).await
            }
            Command::About => {
                self.sender.send_text(chat_id, ABOUT_TEXT).await?;
                self.send_start_menu(chat_id).await
            }
            Command::Back => {
                self.sender.send_text(chat_id, "Переход назад").await?;
                session.menu().await.go_back();
                self.send_start_menu(chat_id).await
            }
            Command::Analysis => {
                let Some(user) = user else {
                    warn!(chat_id, "analyses menu requested by unregistered user");
                    return Ok(());
                };
                self.sender.send_text(chat_id, "Открыто меню анализов").await?;
                self.send_screen(
                    &session,
                    &format!("'{}'. Выберите действие:", user.name),
                    menus::analyses_menu(),
                )
                .await
            }
            Command::History => {
                let Some(user) = user else {
                    warn!(chat_id, "history menu requested by unregistered user");
                    return Ok(());
                };
                self.sender
                    .send_text(chat_id, "Открыто меню истории анализов")
                    .await?;
                self.send_screen(
                    &session,
                    &format!("'{}'. Выберите действие:", user.name),
                    menus::history_menu(),
                )
                .await
            }
            Command::AnalysisHistory => {
                self.send_history(chat_id, user.as_ref(), RecordKind::Report).await
            }
            Command::TemperatureHistory => {
                self.send_history(chat_id, user.as_ref(), RecordKind::Temperature)
                    .await
            }
            Command::PressureHistory => {
                self.send_history(chat_id, user.as_ref(), RecordKind::Pressure)
                    .await
            }
            Command::Pdf => {
                self.sender
                    .send_text(chat_id, "Загрузите pdf файл с анализами")
                    .await?;
                Ok(())
            }
            Command::Manual => {
                let Some(user) = user else {
                    warn!(chat_id, "manual entry requested by unregistered user");
                    return Ok(());
                };
                info!(chat_id, user_id = user.id, "manual entry menu opened");
                self.sender
                    .send_text(chat_id, "Открыто меню ввода результатов в ручную")
                    .await?;
                self.send_screen(&session, "Выберите пункт", menus::manual_menu())
                    .await
            }
            Command::OnOff => {
                // The start menu re-renders in place of the admin menu.
                session.menu().await.go_back();

                if self.chat.is_running() {
                    self.chat.stop();
                } else {
                    self.chat.start();
                }
                warn!(running = self.chat.is_running(), "AI client toggled");

                self.send_start_menu(chat_id).await
            }
            Command::Temperature => {
                self.sender
                    .send_text(chat_id, "Введите показатель температуры тела")
                    .await?;
                session.set_mode(Mode::CollectingTemperature).await;
                Ok(())
            }
            Command::Pressure => {
                self.sender
                    .send_text(
                        chat_id,
                        "Введите показатель артериального давления через ',' (верхнее нижнее пульс)",
                    )
                    .await?;
                session.set_mode(Mode::CollectingPressure).await;
                Ok(())
            }
            Command::Statistics => {
                let users = count_users(self.db.pool()).await?;
                let active = self.registry.count().await;
                let tokens = self.chat.spent_tokens();

                let text = format!(
                    "Зарегистрировано пользователей - '{users}'\n\
                     Активно пользователей - '{active}'\n\
                     Затрачено токенов с момента запуска бота - '{tokens}'"
                );
                self.sender.send_text(chat_id, &text).await?;
                self.send_start_menu(chat_id).await
            }
            Command::Exit => {
                if user.is_none() {
                    warn!(chat_id, "exit requested by unregistered user");
                    return Ok(());
                }
                self.sender
                    .send_text(
                        chat_id,
                        "Подтверждение выхода из системы (с удалением всех данных)",
                    )
                    .await?;
                self.send_screen(&session, "Подтвердите выход:", menus::exit_menu())
                    .await
            }
            Command::Cancel => self.send_start_menu(chat_id).await,
            Command::Ok => {
                let Some(user) = user else {
                    warn!(chat_id, "account deletion requested by unregistered user");
                    return Ok(());
                };

                if !self.registry.remove(chat_id).await {
                    warn!(chat_id, "failed to remove active session");
                    return Ok(());
                }

                delete_records_for_user(self.db.pool(), user.id).await?;
                delete_user(self.db.pool(), user.id).await?;
                info!(chat_id, user_id = user.id, "account deleted");

                self.send_start_menu(chat_id).await
            }
            Command::SignUp => {
                self.sender.send_text(chat_id, "Введите Ваше имя").await?;
                session.set_mode(Mode::CollectingName(Draft::default())).await;
                Ok(())
            }
            // Per-field prompts are inert: the wizard advances on the
            // free-text answer, not on the button.
            Command::Name
            | Command::Gender
            | Command::Age
            | Command::Height
            | Command::Weight => Ok(()),
        }
    }

    async fn handle_document(
        &self,
        chat_id: i64,
        user: &User,
        document: &DocumentRef,
    ) -> Result<()> {
        let Some(extension) = document.extension() else {
            warn!(chat_id, "upload without a file extension, ignored");
            return Ok(());
        };

        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            warn!(chat_id, extension, "unsupported upload, ignored");
            return Ok(());
        }

        self.sender.send_text(chat_id, UPLOAD_ACCEPTED_TEXT).await?;

        match self.decode_document(user, document).await {
            Ok(Some(report)) => {
                self.sender.send_text(chat_id, &report.recommendations).await?;
                insert_record(
                    self.db.pool(),
                    &NewRecord {
                        user_id: user.id,
                        kind: RecordKind::Report,
                        recommendations: report.recommendations,
                        indicators: report.indicators,
                        info: report.info,
                    },
                )
                .await?;
            }
            Ok(None) => {
                self.sender.send_text(chat_id, REJECTION_PHRASE).await?;
            }
            Err(error) => {
                error!(chat_id, %error, "document processing failed");
                self.sender.send_text(chat_id, DOCUMENT_ERROR_TEXT).await?;
            }
        }

        self.send_start_menu(chat_id).await
    }

    /// Download, extract, decode. `Ok(None)` means the model rejected
    /// the file; that is a user-visible outcome, not an error.
    async fn decode_document(
        &self,
        user: &User,
        document: &DocumentRef,
    ) -> Result<Option<MedicalReport>> {
        let bytes = self.sender.download_document(document).await?;
        let text = self.extractor.extract_text(&bytes)?;
        let prompt = build_document_prompt(&user.describe(), &text);

        let Some(content) = self.chat.send_document_text(&prompt).await? else {
            return Err(DispatchError::ChatStopped);
        };

        match parse_report(&content) {
            Ok(report) => Ok(Some(report)),
            Err(ReportError::Rejected) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Render the main menu, lazily creating the session.
    async fn send_start_menu(&self, chat_id: i64) -> Result<()> {
        let user = get_user_by_chat_id(self.db.pool(), chat_id).await?;
        let session = self.registry.get_or_create(chat_id, MenuStack::new()).await;
        session.set_user(user.clone()).await;

        let text = match &user {
            Some(user) => format!("Добро пожаловать '{}'. Выберите действие:", user.name),
            None => "Добро пожаловать. Выберите действие:".to_string(),
        };

        let mut menu = session.menu().await;
        menu.push_if_not_back();
        let markup = menus::start_menu(
            user.as_ref(),
            self.chat.is_running(),
            menu.can_show_previous(),
        );
        self.sender.send_menu(chat_id, &text, &markup).await?;
        menu.set_current(markup);
        Ok(())
    }

    /// Render a fixed sub-menu screen.
    async fn send_screen(
        &self,
        session: &Session,
        text: &str,
        markup: MenuMarkup,
    ) -> Result<()> {
        let mut menu = session.menu().await;
        menu.push_if_not_back();
        self.sender.send_menu(session.chat_id(), text, &markup).await?;
        menu.set_current(markup);
        Ok(())
    }

    async fn send_history(
        &self,
        chat_id: i64,
        user: Option<&User>,
        kind: RecordKind,
    ) -> Result<()> {
        let Some(user) = user else {
            warn!(chat_id, "history requested by unregistered user");
            return Ok(());
        };

        let records =
            list_records(self.db.pool(), user.id, kind, DEFAULT_HISTORY_LIMIT).await?;

        self.sender
            .send_text(chat_id, "История анализов. Будут показаны последние 3 анализа")
            .await?;

        for record in &records {
            self.sender.send_text(chat_id, &record.to_string()).await?;
        }

        self.send_start_menu(chat_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PlainTextExtractor;
    use crate::error::SendError;
    use ai_chat::ChatConfig;
    use async_trait::async_trait;
    use bot_core::Gender;
    use database::NewUser;
    use std::result::Result;
    use std::sync::Mutex as StdMutex;

    #[derive(Debug, Clone)]
    enum Sent {
        Text { chat_id: i64, text: String },
        Menu { chat_id: i64, markup: MenuMarkup },
        CallbackAnswer { text: String },
    }

    #[derive(Default)]
    struct RecordingSender {
        sent: StdMutex<Vec<Sent>>,
        document: StdMutex<Vec<u8>>,
    }

    impl RecordingSender {
        fn texts(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .filter_map(|item| match item {
                    Sent::Text { text, .. } => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }

        fn last_menu(&self) -> Option<MenuMarkup> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find_map(|item| match item {
                    Sent::Menu { markup, .. } => Some(markup.clone()),
                    _ => None,
                })
        }

        fn callback_answers(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .filter_map(|item| match item {
                    Sent::CallbackAnswer { text } => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }

        fn is_empty(&self) -> bool {
            self.sent.lock().unwrap().is_empty()
        }
    }

    #[async_trait]
    impl ReplySender for RecordingSender {
        async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), SendError> {
            self.sent.lock().unwrap().push(Sent::Text {
                chat_id,
                text: text.to_string(),
            });
            Ok(())
        }

        async fn send_menu(
            &self,
            chat_id: i64,
            _text: &str,
            menu: &MenuMarkup,
        ) -> Result<(), SendError> {
            self.sent.lock().unwrap().push(Sent::Menu {
                chat_id,
                markup: menu.clone(),
            });
            Ok(())
        }

        async fn answer_callback(
            &self,
            _callback_id: &str,
            text: &str,
        ) -> Result<(), SendError> {
            self.sent.lock().unwrap().push(Sent::CallbackAnswer {
                text: text.to_string(),
            });
            Ok(())
        }

        async fn download_document(
            &self,
            _document: &DocumentRef,
        ) -> Result<Vec<u8>, SendError> {
            Ok(self.document.lock().unwrap().clone())
        }
    }

    struct Harness {
        dispatcher: Dispatcher,
        sender: Arc<RecordingSender>,
        db: Database,
        registry: Arc<SessionRegistry>,
        chat: Arc<ChatClient>,
    }

    async fn harness() -> Harness {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        let chat = Arc::new(ChatClient::new(ChatConfig::with_api_key("test-key")).unwrap());
        let registry = Arc::new(SessionRegistry::new());
        let sender = Arc::new(RecordingSender::default());

        let dispatcher = Dispatcher::new(
            db.clone(),
            Arc::clone(&chat),
            Arc::clone(&registry),
            sender.clone(),
            Arc::new(PlainTextExtractor),
        );

        Harness {
            dispatcher,
            sender,
            db,
            registry,
            chat,
        }
    }

    async fn seed_user(db: &Database, chat_id: i64, is_admin: bool) -> User {
        create_user(
            db.pool(),
            &NewUser {
                chat_id,
                name: "Ann".to_string(),
                gender: Gender::Female,
                age: 30,
                height: 170.0,
                weight: 60.0,
                is_admin,
            },
        )
        .await
        .unwrap()
    }

    fn document_message(chat_id: i64, file_name: &str) -> GatewayEvent {
        GatewayEvent::Text(TextMessage {
            chat_id,
            text: String::new(),
            document: Some(DocumentRef {
                file_id: "file-1".to_string(),
                file_name: Some(file_name.to_string()),
            }),
        })
    }

    #[tokio::test]
    async fn test_start_creates_session_with_signup_menu() {
        let h = harness().await;

        h.dispatcher
            .handle_event(GatewayEvent::text(1, "/start"))
            .await
            .unwrap();

        assert_eq!(h.registry.count().await, 1);
        let menu = h.sender.last_menu().unwrap();
        assert!(menu.contains(Command::SignUp));
        assert!(!menu.contains(Command::Analysis));
    }

    #[tokio::test]
    async fn test_full_registration_wizard() {
        let h = harness().await;

        h.dispatcher
            .handle_event(GatewayEvent::text(1, "/start"))
            .await
            .unwrap();
        h.dispatcher
            .handle_event(GatewayEvent::callback(1, "cb1", "signUp"))
            .await
            .unwrap();

        for answer in ["Ann", "ж", "30", "170", "60"] {
            h.dispatcher
                .handle_event(GatewayEvent::text(1, answer))
                .await
                .unwrap();
        }

        let user = get_user_by_chat_id(h.db.pool(), 1).await.unwrap().unwrap();
        assert_eq!(user.name, "Ann");
        assert_eq!(user.gender(), Gender::Female);
        assert_eq!(user.age, 30);
        assert_eq!(user.height, 170.0);
        assert_eq!(user.weight, 60.0);

        let session = h.registry.get(1).await.unwrap();
        assert_eq!(session.mode().await, Mode::None);
        assert!(h
            .sender
            .texts()
            .contains(&"Вы зарегистрированы".to_string()));

        // The start menu now shows the registered layout.
        let menu = h.sender.last_menu().unwrap();
        assert!(menu.contains(Command::Analysis));
        assert!(menu.contains(Command::Exit));
    }

    #[tokio::test]
    async fn test_wizard_stalls_on_bad_age() {
        let h = harness().await;

        h.dispatcher
            .handle_event(GatewayEvent::text(1, "/start"))
            .await
            .unwrap();
        h.dispatcher
            .handle_event(GatewayEvent::callback(1, "cb1", "signUp"))
            .await
            .unwrap();
        h.dispatcher.handle_event(GatewayEvent::text(1, "Ann")).await.unwrap();
        h.dispatcher.handle_event(GatewayEvent::text(1, "м")).await.unwrap();

        h.dispatcher
            .handle_event(GatewayEvent::text(1, "тридцать"))
            .await
            .unwrap();

        // Still waiting for a readable age; nothing persisted.
        let session = h.registry.get(1).await.unwrap();
        assert!(matches!(session.mode().await, Mode::CollectingAge(_)));
        assert!(get_user_by_chat_id(h.db.pool(), 1).await.unwrap().is_none());

        h.dispatcher.handle_event(GatewayEvent::text(1, "30")).await.unwrap();
        assert!(matches!(session.mode().await, Mode::CollectingHeight(_)));
    }

    async fn start_vitals(h: &Harness, chat_id: i64, command: &str) {
        h.dispatcher
            .handle_event(GatewayEvent::text(chat_id, "/start"))
            .await
            .unwrap();
        h.dispatcher
            .handle_event(GatewayEvent::callback(chat_id, "cb1", command))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_temperature_comma_and_dot() {
        let h = harness().await;
        let user = seed_user(&h.db, 1, false).await;

        for input in ["36,6", "36.6"] {
            start_vitals(&h, 1, "temperature").await;
            h.dispatcher
                .handle_event(GatewayEvent::text(1, input))
                .await
                .unwrap();
        }

        let records = list_records(h.db.pool(), user.id, RecordKind::Temperature, 10)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(record.indicators.contains("36.6"));
        }

        let session = h.registry.get(1).await.unwrap();
        assert_eq!(session.mode().await, Mode::None);
    }

    #[tokio::test]
    async fn test_temperature_bad_input_resets_without_record() {
        let h = harness().await;
        let user = seed_user(&h.db, 1, false).await;

        for input in ["99", "abc"] {
            start_vitals(&h, 1, "temperature").await;
            h.dispatcher
                .handle_event(GatewayEvent::text(1, input))
                .await
                .unwrap();

            let session = h.registry.get(1).await.unwrap();
            assert_eq!(session.mode().await, Mode::None);
        }

        let records = list_records(h.db.pool(), user.id, RecordKind::Temperature, 10)
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_pressure_records_three_labeled_lines() {
        let h = harness().await;
        let user = seed_user(&h.db, 1, false).await;

        start_vitals(&h, 1, "pressure").await;
        h.dispatcher
            .handle_event(GatewayEvent::text(1, "120,80,70"))
            .await
            .unwrap();

        let records = list_records(h.db.pool(), user.id, RecordKind::Pressure, 10)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].indicators,
            "Верхнее - 120\nНижнее - 80\nПульс - 70"
        );

        let session = h.registry.get(1).await.unwrap();
        assert_eq!(session.mode().await, Mode::None);
    }

    #[tokio::test]
    async fn test_pressure_too_many_fields_stalls() {
        let h = harness().await;
        let user = seed_user(&h.db, 1, false).await;

        start_vitals(&h, 1, "pressure").await;
        h.dispatcher
            .handle_event(GatewayEvent::text(1, "1,2,3,4"))
            .await
            .unwrap();

        let records = list_records(h.db.pool(), user.id, RecordKind::Pressure, 10)
            .await
            .unwrap();
        assert!(records.is_empty());

        // Mode is unchanged: the user can resend.
        let session = h.registry.get(1).await.unwrap();
        assert_eq!(session.mode().await, Mode::CollectingPressure);
    }

    #[tokio::test]
    async fn test_callback_without_session_is_dropped() {
        let h = harness().await;

        h.dispatcher
            .handle_event(GatewayEvent::callback(1, "cb1", "about"))
            .await
            .unwrap();

        assert!(h.sender.is_empty());
        assert_eq!(h.registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_callback_is_acknowledged() {
        let h = harness().await;

        h.dispatcher
            .handle_event(GatewayEvent::text(1, "/start"))
            .await
            .unwrap();
        h.dispatcher
            .handle_event(GatewayEvent::callback(1, "cb1", "contacts"))
            .await
            .unwrap();

        assert_eq!(
            h.sender.callback_answers(),
            vec!["Вы выбрали: contacts".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unknown_command_reports_itself() {
        let h = harness().await;

        h.dispatcher
            .handle_event(GatewayEvent::text(1, "/start"))
            .await
            .unwrap();
        h.dispatcher
            .handle_event(GatewayEvent::callback(1, "cb1", "bogus"))
            .await
            .unwrap();

        assert!(h
            .sender
            .texts()
            .contains(&"'bogus' - Нет такой команды".to_string()));
    }

    #[tokio::test]
    async fn test_exit_confirmation_deletes_account() {
        let h = harness().await;
        let user = seed_user(&h.db, 1, false).await;

        insert_record(
            h.db.pool(),
            &NewRecord {
                user_id: user.id,
                kind: RecordKind::Temperature,
                recommendations: String::new(),
                indicators: "t = 36.6".to_string(),
                info: RecordKind::Temperature.description().to_string(),
            },
        )
        .await
        .unwrap();

        h.dispatcher
            .handle_event(GatewayEvent::text(1, "/start"))
            .await
            .unwrap();
        h.dispatcher
            .handle_event(GatewayEvent::callback(1, "cb1", "exit"))
            .await
            .unwrap();
        h.dispatcher
            .handle_event(GatewayEvent::callback(1, "cb2", "ok"))
            .await
            .unwrap();

        assert!(get_user_by_chat_id(h.db.pool(), 1).await.unwrap().is_none());
        assert_eq!(
            list_records(h.db.pool(), user.id, RecordKind::Temperature, 10)
                .await
                .unwrap()
                .len(),
            0
        );

        // The follow-up start menu is the unregistered one.
        let menu = h.sender.last_menu().unwrap();
        assert!(menu.contains(Command::SignUp));
    }

    #[tokio::test]
    async fn test_on_off_toggles_ai_client() {
        let h = harness().await;
        seed_user(&h.db, 1, true).await;

        h.dispatcher
            .handle_event(GatewayEvent::text(1, "/start"))
            .await
            .unwrap();

        assert!(!h.chat.is_running());
        h.dispatcher
            .handle_event(GatewayEvent::callback(1, "cb1", "onOff"))
            .await
            .unwrap();
        assert!(h.chat.is_running());

        h.dispatcher
            .handle_event(GatewayEvent::callback(1, "cb2", "onOff"))
            .await
            .unwrap();
        assert!(!h.chat.is_running());
    }

    #[tokio::test]
    async fn test_statistics_reports_counts() {
        let h = harness().await;
        seed_user(&h.db, 1, true).await;

        h.dispatcher
            .handle_event(GatewayEvent::text(1, "/start"))
            .await
            .unwrap();
        h.dispatcher
            .handle_event(GatewayEvent::callback(1, "cb1", "statistics"))
            .await
            .unwrap();

        let stats = h
            .sender
            .texts()
            .into_iter()
            .find(|text| text.contains("Зарегистрировано пользователей"))
            .unwrap();
        assert!(stats.contains("Зарегистрировано пользователей - '1'"));
        assert!(stats.contains("Активно пользователей - '1'"));
        assert!(stats.contains("Затрачено токенов с момента запуска бота - '0'"));
    }

    #[tokio::test]
    async fn test_back_returns_to_start_menu_without_back_button() {
        let h = harness().await;
        seed_user(&h.db, 1, false).await;

        h.dispatcher
            .handle_event(GatewayEvent::text(1, "/start"))
            .await
            .unwrap();
        h.dispatcher
            .handle_event(GatewayEvent::callback(1, "cb1", "analysis"))
            .await
            .unwrap();
        h.dispatcher
            .handle_event(GatewayEvent::callback(1, "cb2", "back"))
            .await
            .unwrap();

        assert!(h.sender.texts().contains(&"Переход назад".to_string()));

        // History was cleared by the back action, so the re-rendered
        // start menu offers no further back step.
        let menu = h.sender.last_menu().unwrap();
        assert!(menu.contains(Command::Analysis));
        assert!(!menu.contains(Command::Back));

        let session = h.registry.get(1).await.unwrap();
        assert!(!session.menu().await.can_show_previous());
    }

    #[tokio::test]
    async fn test_history_lists_latest_records() {
        let h = harness().await;
        let user = seed_user(&h.db, 1, false).await;

        for value in ["36.6", "36.9", "37.1", "38.2"] {
            insert_record(
                h.db.pool(),
                &NewRecord {
                    user_id: user.id,
                    kind: RecordKind::Temperature,
                    recommendations: String::new(),
                    indicators: format!("t = {value}"),
                    info: RecordKind::Temperature.description().to_string(),
                },
            )
            .await
            .unwrap();
        }

        h.dispatcher
            .handle_event(GatewayEvent::text(1, "/start"))
            .await
            .unwrap();
        h.dispatcher
            .handle_event(GatewayEvent::callback(1, "cb1", "temperatureHistory"))
            .await
            .unwrap();

        let texts = h.sender.texts();
        assert!(texts
            .contains(&"История анализов. Будут показаны последние 3 анализа".to_string()));

        // Only the three newest readings, newest first.
        let shown: Vec<&String> = texts.iter().filter(|t| t.contains("t = ")).collect();
        assert_eq!(shown.len(), 3);
        assert!(shown[0].contains("38.2"));
        assert!(!texts.iter().any(|t| t.contains("36.6")));
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_ignored() {
        let h = harness().await;
        seed_user(&h.db, 1, false).await;

        h.dispatcher
            .handle_event(document_message(1, "results.docx"))
            .await
            .unwrap();

        assert!(h.sender.is_empty());
    }

    #[tokio::test]
    async fn test_upload_with_stopped_ai_reports_error() {
        let h = harness().await;
        seed_user(&h.db, 1, false).await;
        *h.sender.document.lock().unwrap() = "Гемоглобин - 140".as_bytes().to_vec();

        h.dispatcher
            .handle_event(document_message(1, "Results.PDF"))
            .await
            .unwrap();

        let texts = h.sender.texts();
        assert!(texts[0].starts_with("Файл проверен и успешно загружен"));
        assert!(texts.contains(&DOCUMENT_ERROR_TEXT.to_string()));
    }

    #[tokio::test]
    async fn test_upload_from_unregistered_user_is_ignored() {
        let h = harness().await;

        h.dispatcher
            .handle_event(document_message(1, "results.pdf"))
            .await
            .unwrap();

        assert!(h.sender.is_empty());
    }
}
