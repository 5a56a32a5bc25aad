use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::HandPhase;
use crate::domain::Wallet;
use crate::engine::actions::Action;

/// Тип записи в логе действий раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandActionKind {
    #[serde(rename = "fold")]
    Fold,
    #[serde(rename = "check")]
    Check,
    #[serde(rename = "call")]
    Call,
    #[serde(rename = "raise")]
    Raise,
    #[serde(rename = "post_sb")]
    PostSmallBlind,
    #[serde(rename = "post_bb")]
    PostBigBlind,
    /// Анте большого блайнда (мёртвые фишки).
    #[serde(rename = "post_ante")]
    PostAnte,
}

impl From<Action> for HandActionKind {
    fn from(action: Action) -> Self {
        match action {
            Action::Fold => HandActionKind::Fold,
            Action::Check => HandActionKind::Check,
            Action::Call => HandActionKind::Call,
            Action::RaiseTo(_) => HandActionKind::Raise,
        }
    }
}

/// Одна запись лога: кто, что, сколько фишек ушло в банк, на какой улице.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandAction {
    pub index: u32,
    pub wallet: Wallet,
    pub phase: HandPhase,
    pub kind: HandActionKind,
    /// Фишки, фактически поставленные этим действием.
    pub amount: Chips,
    /// Сумма рейза "до", если это рейз.
    pub raise_to: Option<Chips>,
    /// Действие агента было недопустимым и заменено на это.
    pub substituted: bool,
}

/// Полная история действий раздачи: единица аудита и реплея.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandHistory {
    pub actions: Vec<HandAction>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, wallet: &str, phase: HandPhase, kind: HandActionKind, amount: Chips) {
        self.push_full(wallet, phase, kind, amount, None, false);
    }

    pub fn push_full(
        &mut self,
        wallet: &str,
        phase: HandPhase,
        kind: HandActionKind,
        amount: Chips,
        raise_to: Option<Chips>,
        substituted: bool,
    ) {
        let index = self.actions.len() as u32;
        self.actions.push(HandAction {
            index,
            wallet: wallet.to_string(),
            phase,
            kind,
            amount,
            raise_to,
            substituted,
        });
    }

    pub fn into_actions(self) -> Vec<HandAction> {
        self.actions
    }
}
