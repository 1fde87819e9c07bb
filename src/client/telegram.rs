//! Telegram MTProto client wrapper.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use grammers_client::session::Session;
use grammers_client::types::{Chat, Message};
use grammers_client::{Client, Config as ClientConfig, InitParams, SignInError};

use crate::config::{ChatRef, Config};
use crate::error::{Error, Result};

/// Maximum message IDs per get-messages request.
pub const ID_BATCH_SIZE: usize = 100;

/// Connected Telegram client with a file-backed session.
pub struct Telegram {
    client: Client,
    session_file: PathBuf,
}

impl Telegram {
    /// Connect to Telegram, signing in interactively if the session is
    /// not yet authorized.
    pub async fn connect(config: &Config) -> Result<Self> {
        let session_file = config.account.session_file.clone();
        let session = Session::load_file_or_create(&session_file)?;

        tracing::debug!("Connecting to Telegram...");
        let client = Client::connect(ClientConfig {
            session,
            api_id: config.account.api_id,
            api_hash: config.account.api_hash.clone(),
            params: InitParams::default(),
        })
        .await
        .map_err(|e| Error::Connect(e.to_string()))?;

        let telegram = Self {
            client,
            session_file,
        };

        if !telegram.client.is_authorized().await? {
            telegram.sign_in_interactive().await?;
        }

        Ok(telegram)
    }

    /// Access the underlying grammers client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Interactive phone/code sign-in, with optional 2FA password.
    async fn sign_in_interactive(&self) -> Result<()> {
        let phone = prompt("Enter your phone number (international format): ")?;
        let token = self
            .client
            .request_login_code(&phone)
            .await
            .map_err(|e| Error::Authentication(e.to_string()))?;

        let code = prompt("Enter the login code you received: ")?;
        match self.client.sign_in(&token, &code).await {
            Ok(_) => {}
            Err(SignInError::PasswordRequired(password_token)) => {
                let hint = password_token
                    .hint()
                    .map(|h| h.to_string())
                    .unwrap_or_else(|| "none".to_string());
                let password = prompt(&format!("Enter your 2FA password (hint: {}): ", hint))?;
                self.client
                    .check_password(password_token, password.trim())
                    .await
                    .map_err(|e| Error::Authentication(e.to_string()))?;
            }
            Err(e) => return Err(Error::Authentication(e.to_string())),
        }

        self.save_session()?;
        tracing::info!("Signed in, session saved to {}", self.session_file.display());
        Ok(())
    }

    /// Persist the session to disk.
    pub fn save_session(&self) -> Result<()> {
        self.client
            .session()
            .save_to_file(&self.session_file)
            .map_err(Error::Io)
    }

    /// Resolve a chat reference to a full chat.
    pub async fn resolve_chat(&self, chat_ref: &ChatRef) -> Result<Chat> {
        match chat_ref {
            ChatRef::Username(username) => self
                .client
                .resolve_username(username)
                .await?
                .ok_or_else(|| Error::ChatNotFound(format!("@{}", username))),
            ChatRef::Id(id) => {
                let wanted = normalize_chat_id(*id);
                let mut dialogs = self.client.iter_dialogs();
                while let Some(dialog) = dialogs.next().await? {
                    let chat = dialog.chat();
                    if chat.id() == wanted || chat.id() == *id {
                        return Ok(chat.clone());
                    }
                }
                Err(Error::ChatNotFound(id.to_string()))
            }
        }
    }

    /// Fetch messages by ID, in request-sized batches, skipping deleted ones.
    pub async fn messages_by_id(&self, chat: &Chat, ids: &[i32]) -> Result<Vec<Message>> {
        let mut messages = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(ID_BATCH_SIZE) {
            let fetched = self.client.get_messages_by_id(chat, chunk).await?;
            messages.extend(fetched.into_iter().flatten());
        }
        Ok(messages)
    }

    /// Re-fetch a single message, e.g. after a file reference expired.
    pub async fn refetch_message(&self, chat: &Chat, id: i32) -> Result<Option<Message>> {
        let fetched = self.client.get_messages_by_id(chat, &[id]).await?;
        Ok(fetched.into_iter().flatten().next())
    }
}

/// Map Bot-API style marked chat IDs to the bare IDs grammers reports.
///
/// `-100xxxxxxxxxx` marks channels/supergroups, a plain negative ID marks
/// basic groups; positive IDs pass through.
fn normalize_chat_id(id: i64) -> i64 {
    const CHANNEL_MARK: i64 = -1_000_000_000_000;
    if id <= CHANNEL_MARK {
        -(id - CHANNEL_MARK)
    } else if id < 0 {
        -id
    } else {
        id
    }
}

/// Read a line from stdin after printing a prompt.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
