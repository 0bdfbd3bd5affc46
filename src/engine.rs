//! Engine: runs a session through catalog items, flows and menus.
//!
//! A conversation keeps a queue of pending actions. The engine pops
//! actions until one needs input from the caller (a prompt or a menu) or
//! the session ends. Showing a menu drops whatever was still pending: the
//! chosen option's actions become the whole queue, so an option that
//! wants to resume a sequence has to carry it.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{FlowError, Result};
use crate::flows::{self, FlowContext, FlowId};
use crate::menu::{Action, Caption, DynamicMenu, ItemCatalog, ItemDef, MenuOption, Step};
use crate::profiles::ProfileRegistry;
use crate::session::{Session, ValueType};

/// What the caller sees after each turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Free-text prompt; awaiting input.
    Prompt(String),
    /// Numbered menu; awaiting a choice.
    Menu(String),
    /// Session is over.
    End(String),
}

impl Screen {
    pub fn text(&self) -> &str {
        match self {
            Self::Prompt(t) | Self::Menu(t) | Self::End(t) => t,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::End(_))
    }
}

#[derive(Debug, Clone)]
enum Awaiting {
    Prompt {
        caption: Caption,
        name: String,
        value_type: ValueType,
    },
    Menu(DynamicMenu),
    Ended,
}

/// Per-session engine state.
#[derive(Debug, Clone)]
pub struct Conversation {
    session: Session,
    pending: VecDeque<Action>,
    awaiting: Awaiting,
}

impl Conversation {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.awaiting, Awaiting::Ended)
    }
}

/// Drives conversations against a shared catalog and registry.
pub struct Engine {
    catalog: Arc<ItemCatalog>,
    registry: Arc<ProfileRegistry>,
    language: String,
}

impl Engine {
    pub fn new(
        catalog: Arc<ItemCatalog>,
        registry: Arc<ProfileRegistry>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            registry,
            language: language.into(),
        }
    }

    /// Start a session for `msisdn` at item `entry`.
    pub fn start(&self, msisdn: &str, entry: &str) -> Result<(Conversation, Screen)> {
        self.catalog.resolve(entry)?;
        let mut conversation = Conversation {
            session: Session::new(msisdn),
            pending: VecDeque::from([Action::item(entry)]),
            awaiting: Awaiting::Ended,
        };
        debug!(session = %conversation.session.id(), msisdn = %msisdn, entry = %entry, "Session started");
        let screen = self.advance(&mut conversation)?;
        Ok((conversation, screen))
    }

    /// Feed one line of caller input.
    ///
    /// Invalid prompt input or an out-of-range menu choice re-shows the
    /// same screen; neither touches the session or the registry.
    pub fn reply(&self, conversation: &mut Conversation, input: &str) -> Result<Screen> {
        let input = input.trim();
        match conversation.awaiting.clone() {
            Awaiting::Ended => Err(FlowError::SessionEnded.into()),
            Awaiting::Prompt {
                caption,
                name,
                value_type,
            } => match value_type.parse(input) {
                Ok(value) => {
                    conversation.session.set_value(name, value);
                    self.advance(conversation)
                }
                Err(failure) => {
                    warn!(
                        session = %conversation.session.id(),
                        code = failure.code,
                        "Prompt input rejected"
                    );
                    let message = self.catalog.failure_message(&failure, &self.language);
                    let prompt = caption.render(&self.language, &conversation.session);
                    Ok(Screen::Prompt(format!("{message}\n{prompt}")))
                }
            },
            Awaiting::Menu(menu) => {
                let choice = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| menu.options.get(i));
                let Some(option) = choice else {
                    debug!(session = %conversation.session.id(), input = %input, "Invalid menu choice");
                    return Ok(Screen::Menu(self.render_menu(&menu, &conversation.session)));
                };
                conversation.pending = option.actions.iter().cloned().collect();
                self.advance(conversation)
            }
        }
    }

    fn advance(&self, conversation: &mut Conversation) -> Result<Screen> {
        while let Some(action) = conversation.pending.pop_front() {
            let step = match action {
                Action::Set { name, value } => {
                    conversation.session.set_value(name, value);
                    continue;
                }
                Action::Final(caption) => Step::Final(caption),
                Action::Flow(flow) => self.run_flow(flow, &conversation.session)?,
                Action::Item(id) => match self.catalog.resolve(&id)? {
                    ItemDef::Prompt {
                        caption,
                        name,
                        value_type,
                    } => {
                        let text = caption.render(&self.language, &conversation.session);
                        conversation.awaiting = Awaiting::Prompt {
                            caption: caption.clone(),
                            name: name.clone(),
                            value_type: *value_type,
                        };
                        return Ok(Screen::Prompt(text));
                    }
                    ItemDef::Final { caption } => Step::Final(caption.clone()),
                    ItemDef::Menu { caption, options } => Step::Menu(DynamicMenu::new(
                        caption.clone(),
                        options
                            .iter()
                            .map(|o| {
                                MenuOption::new(
                                    o.caption.clone(),
                                    o.next.iter().map(|id| Action::item(id)).collect(),
                                )
                            })
                            .collect(),
                    )),
                    ItemDef::Flow { flow } => self.run_flow(*flow, &conversation.session)?,
                },
            };

            match step {
                Step::Continue => {}
                Step::Menu(menu) => {
                    if !conversation.pending.is_empty() {
                        debug!(
                            session = %conversation.session.id(),
                            dropped = conversation.pending.len(),
                            "Menu replaces pending items"
                        );
                        conversation.pending.clear();
                    }
                    let text = self.render_menu(&menu, &conversation.session);
                    conversation.awaiting = Awaiting::Menu(menu);
                    return Ok(Screen::Menu(text));
                }
                Step::Final(caption) => return Ok(self.end(conversation, &caption)),
            }
        }

        Ok(self.end(conversation, &Caption::new()))
    }

    fn run_flow(&self, flow: FlowId, session: &Session) -> Result<Step> {
        debug!(session = %session.id(), flow = %flow, "Running flow");
        flows::run(flow, FlowContext::new(&self.registry, &self.catalog), session)
    }

    fn end(&self, conversation: &mut Conversation, caption: &Caption) -> Screen {
        conversation.awaiting = Awaiting::Ended;
        conversation.pending.clear();
        debug!(session = %conversation.session.id(), "Session ended");
        Screen::End(caption.render(&self.language, &conversation.session))
    }

    fn render_menu(&self, menu: &DynamicMenu, session: &Session) -> String {
        let mut lines = vec![menu.title.render(&self.language, session)];
        for (i, option) in menu.options.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, option.caption.render(&self.language, session)));
        }
        lines.join("\n")
    }
}
