//! 事件总线系统，用于解耦引擎与表现层
//!
//! The engine publishes every state change as a [`DuelEvent`]. A
//! presentation layer subscribes handlers to update its display; tests can
//! drain the queue or read the bounded history.

use combat::{AttackReport, CombatantId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};

/// 对局事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelEvent {
    /// The match began and `first` attacks first.
    MatchStarted { first: CombatantId },
    /// An attack landed.
    AttackResolved(AttackReport),
    /// An attack could not be applied because a stat was unusable.
    AttackSkipped {
        attacker: CombatantId,
        reason: String,
    },
    /// The turn passed to `active`.
    TurnChanged { active: CombatantId },
    /// `winner` reduced the opponent to zero hit points.
    MatchEnded { winner: CombatantId },
}

impl DuelEvent {
    /// 获取事件类型的字符串表示
    pub fn event_type(&self) -> &'static str {
        match self {
            DuelEvent::MatchStarted { .. } => "MatchStarted",
            DuelEvent::AttackResolved(_) => "AttackResolved",
            DuelEvent::AttackSkipped { .. } => "AttackSkipped",
            DuelEvent::TurnChanged { .. } => "TurnChanged",
            DuelEvent::MatchEnded { .. } => "MatchEnded",
        }
    }
}

impl fmt::Display for DuelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuelEvent::MatchStarted { first } => write!(f, "Player {}'s Turn!", first),
            DuelEvent::AttackResolved(report) => write!(f, "{}", report.message()),
            DuelEvent::AttackSkipped { attacker, reason } => {
                write!(f, "Player {} could not attack: {}", attacker, reason)
            }
            DuelEvent::TurnChanged { active } => write!(f, "Player {}'s Turn!", active),
            DuelEvent::MatchEnded { winner } => write!(f, "Player {} WINS!", winner),
        }
    }
}

/// 事件处理器优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    /// 最高优先级
    Critical = 0,
    High = 1,
    /// 普通优先级 - 默认优先级
    Normal = 2,
    /// 低优先级 - 用于 UI 更新等
    Low = 3,
    Lowest = 4,
}

/// 事件处理器 trait
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &DuelEvent);

    /// 事件处理器的名称（用于调试）
    fn name(&self) -> &str;

    fn priority(&self) -> Priority {
        Priority::Normal
    }

    /// 是否应该处理此事件（事件过滤）
    fn should_handle(&self, _event: &DuelEvent) -> bool {
        true
    }
}

struct HandlerEntry {
    handler: Box<dyn EventHandler>,
    priority: Priority,
}

/// Queue plus subscriber dispatch for duel events.
pub struct EventBus {
    events: Vec<DuelEvent>,
    /// Handlers keyed by `DuelEvent::event_type`
    handlers: HashMap<&'static str, Vec<HandlerEntry>>,
    global_handlers: Vec<HandlerEntry>,
    history: VecDeque<DuelEvent>,
    max_history: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_history_size(100)
    }

    /// 创建一个指定历史记录大小的事件总线
    pub fn with_history_size(max_history: usize) -> Self {
        Self {
            events: Vec::new(),
            handlers: HashMap::new(),
            global_handlers: Vec::new(),
            history: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    /// Record, dispatch to subscribers, then queue for `drain`.
    pub fn publish(&mut self, event: DuelEvent) {
        self.add_to_history(event.clone());
        self.dispatch_to_handlers(&event);
        self.events.push(event);
    }

    /// 获取所有待处理事件并清空队列
    pub fn drain(&mut self) -> impl Iterator<Item = DuelEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 注册事件处理器（处理特定类型的事件）
    pub fn subscribe(&mut self, event_type: &'static str, handler: Box<dyn EventHandler>) {
        let priority = handler.priority();
        let handlers = self.handlers.entry(event_type).or_default();
        handlers.push(HandlerEntry { handler, priority });
        handlers.sort_by(|a, b| a.priority.cmp(&b.priority));
    }

    /// 注册全局事件处理器（处理所有事件）
    pub fn subscribe_all(&mut self, handler: Box<dyn EventHandler>) {
        let priority = handler.priority();
        self.global_handlers.push(HandlerEntry { handler, priority });
        self.global_handlers
            .sort_by(|a, b| a.priority.cmp(&b.priority));
    }

    fn dispatch_to_handlers(&mut self, event: &DuelEvent) {
        for entry in &mut self.global_handlers {
            if entry.handler.should_handle(event) {
                entry.handler.handle(event);
            }
        }

        if let Some(handlers) = self.handlers.get_mut(event.event_type()) {
            for entry in handlers {
                if entry.handler.should_handle(event) {
                    entry.handler.handle(event);
                }
            }
        }
    }

    fn add_to_history(&mut self, event: DuelEvent) {
        if self.max_history == 0 {
            return;
        }
        if self.history.len() >= self.max_history {
            self.history.pop_front();
        }
        self.history.push_back(event);
    }

    /// 获取事件历史（最近的 n 个事件）
    pub fn get_history(&self, count: usize) -> Vec<DuelEvent> {
        let start = self.history.len().saturating_sub(count);
        self.history.range(start..).cloned().collect()
    }

    /// Recorded events, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &DuelEvent> + '_ {
        self.history.iter()
    }

    pub fn subscriber_count(&self) -> usize {
        self.global_handlers.len() + self.handlers.values().map(|v| v.len()).sum::<usize>()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects events into a shared list.
pub struct RecordingHandler {
    events: Arc<Mutex<Vec<DuelEvent>>>,
}

impl RecordingHandler {
    pub fn new(events: Arc<Mutex<Vec<DuelEvent>>>) -> Self {
        Self { events }
    }
}

impl EventHandler for RecordingHandler {
    fn handle(&mut self, event: &DuelEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }

    fn name(&self) -> &str {
        "RecordingHandler"
    }
}
