//! PIN entry
//!
//! Format validation, the state of the four-box entry widget and a terminal
//! prompt implementing `PinPrompt`.

use crate::core::gate::PinPrompt;
use crate::shared::constants::PIN_LENGTH;
use crate::shared::error::WalletError;
use async_trait::async_trait;
use std::io;
use std::sync::Arc;
use zeroize::Zeroizing;

/// Shown after a rejected unlock
pub const INVALID_PIN_RETRY_MESSAGE: &str = "Invalid PIN. Please try again.";
/// Shown after any other unlock failure
pub const UNLOCK_FAILED_MESSAGE: &str = "Failed to unlock wallet. Please try again.";
/// Shown when the entered PIN has the wrong shape
pub const PIN_FORMAT_MESSAGE: &str = "PIN must be exactly 4 digits";

const MAX_FORMAT_RETRIES: usize = 3;

/// A PIN is exactly four ASCII digits
pub fn validate_pin(pin: &str) -> Result<(), WalletError> {
    if pin.len() != PIN_LENGTH || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WalletError::validation(PIN_FORMAT_MESSAGE));
    }
    Ok(())
}

/// User-facing text for an unlock failure. Never reveals the cause.
pub fn failure_message(error: &WalletError) -> &'static str {
    if error.is_authentication_failure() {
        INVALID_PIN_RETRY_MESSAGE
    } else {
        UNLOCK_FAILED_MESSAGE
    }
}

/// State of the four-box PIN entry
#[derive(Default)]
pub struct PinEntry {
    digits: Zeroizing<String>,
    error: Option<String>,
}

impl PinEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a digit. Non-digits and input past the fourth box are ignored.
    pub fn push_digit(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() || self.digits.len() >= PIN_LENGTH {
            return false;
        }
        self.error = None;
        self.digits.push(c);
        true
    }

    pub fn backspace(&mut self) {
        self.digits.pop();
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.digits.len() == PIN_LENGTH
    }

    /// Hand over a complete PIN and reset the boxes
    pub fn take_pin(&mut self) -> Option<Zeroizing<String>> {
        if !self.is_complete() {
            return None;
        }
        Some(std::mem::take(&mut self.digits))
    }

    /// Clear every box and show `message`. Never pre-fills.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.digits = Zeroizing::new(String::new());
        self.error = Some(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

type PinReader = dyn Fn(&str) -> io::Result<String> + Send + Sync;

/// Reads a hidden PIN from the terminal
pub struct TerminalPinPrompt {
    reader: Arc<PinReader>,
}

impl TerminalPinPrompt {
    pub fn new() -> Self {
        Self::with_reader(|prompt| rpassword::prompt_password(prompt))
    }

    /// Use a custom line reader instead of the tty
    pub fn with_reader<F>(reader: F) -> Self
    where
        F: Fn(&str) -> io::Result<String> + Send + Sync + 'static,
    {
        Self { reader: Arc::new(reader) }
    }

    async fn read(&self, prompt: String) -> Option<Zeroizing<String>> {
        let reader = Arc::clone(&self.reader);
        match tokio::task::spawn_blocking(move || reader(&prompt)).await {
            Ok(Ok(line)) => Some(Zeroizing::new(line)),
            Ok(Err(e)) => {
                log::warn!("Failed to read PIN: {}", e);
                None
            }
            Err(e) => {
                log::warn!("PIN reader task failed: {}", e);
                None
            }
        }
    }
}

impl Default for TerminalPinPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PinPrompt for TerminalPinPrompt {
    async fn prompt_pin(&self, owner_id: &str, failure: Option<&'static str>) -> Option<String> {
        let mut notice = failure.map(str::to_string);

        for _ in 0..MAX_FORMAT_RETRIES {
            let prompt = match notice.take() {
                Some(message) => format!("{}\nEnter your 4-digit PIN for {}: ", message, owner_id),
                None => format!("Enter your 4-digit PIN for {}: ", owner_id),
            };

            let line = self.read(prompt).await?;
            let pin = line.trim();
            if pin.is_empty() {
                return None;
            }
            if validate_pin(pin).is_ok() {
                return Some(pin.to_string());
            }
            notice = Some(PIN_FORMAT_MESSAGE.to_string());
        }

        log::debug!("PIN prompt abandoned after {} malformed entries", MAX_FORMAT_RETRIES);
        None
    }
}
