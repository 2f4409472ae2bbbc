use anyhow::Result;
use crate::api::{AskClient, AskResponse};
use crate::chat::Conversation;
use crate::config::Config;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub conversation: Conversation,

    // Input state
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Chat viewport state
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of chat area, updated during render
    pub chat_width: u16,  // inner width of chat area, for wrap calculations

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // In-flight request (at most one)
    pub query_task: Option<tokio::task::JoinHandle<Result<AskResponse>>>,

    client: AskClient,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = Config::load().unwrap_or_else(|_| Config::new());
        let client = AskClient::new(&config.resolve_endpoint());

        Ok(Self {
            should_quit: false,
            conversation: Conversation::new(),

            input: String::new(),
            cursor: 0,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            animation_frame: 0,

            query_task: None,
            client,
        })
    }

    pub fn pending(&self) -> bool {
        self.conversation.pending()
    }

    /// Submit the current input as a question.
    ///
    /// Ignored while a request is in flight (the send affordance is disabled),
    /// and a no-op for whitespace-only input. Otherwise appends the user
    /// message, clears the input box, and spawns the gateway call.
    pub fn submit(&mut self) {
        if self.query_task.is_some() {
            return;
        }

        let Some(question) = self.conversation.begin_turn(&self.input) else {
            return;
        };

        self.input.clear();
        self.cursor = 0;
        self.scroll_chat_to_bottom();

        let client = self.client.clone();
        self.query_task = Some(tokio::spawn(async move { client.ask(&question).await }));
    }

    /// Drain the query task if it has finished, turning its outcome into the
    /// bot reply for this turn. Called on every tick.
    pub async fn poll_query(&mut self) {
        let finished = self
            .query_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        if let Some(task) = self.query_task.take() {
            let outcome = match task.await {
                Ok(result) => result.map(|response| response.answer),
                Err(e) => Err(anyhow::anyhow!("query task failed: {}", e)),
            };
            self.conversation.resolve(outcome);
            self.scroll_chat_to_bottom();
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Chat scrolling
    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max_scroll = self.chat_line_count().saturating_sub(self.chat_height);
        if self.chat_scroll < max_scroll {
            self.chat_scroll = self.chat_scroll.saturating_add(1);
        }
    }

    pub fn scroll_half_page_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(self.chat_height / 2);
    }

    pub fn scroll_half_page_down(&mut self) {
        let max_scroll = self.chat_line_count().saturating_sub(self.chat_height);
        self.chat_scroll = (self.chat_scroll + self.chat_height / 2).min(max_scroll);
    }

    /// Scroll so the newest message (or the "Thinking..." line) is visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        let total_lines = self.chat_line_count();

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        } else {
            self.chat_scroll = 0;
        }
    }

    /// Estimate of rendered chat lines, accounting for wrapping.
    fn chat_line_count(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in self.conversation.messages() {
            total_lines += 1; // Role line ("You:" or "Assistant:")
            for line in msg.text.lines() {
                // Character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after message
        }

        if self.pending() {
            total_lines += 2; // "Assistant:" + "Thinking..."
        }

        total_lines
    }
}
