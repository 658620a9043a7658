/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! The expression trail and the stack of pending binary operators.

use crate::{
    error::Result,
    numbers::Number,
    ops::{BinaryOp, Context},
};

/// Symbol committed by Equals
pub const EQUALS: &str = "=";

/// One committed operand and the operator that committed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub symbol: &'static str,
    pub operand: Number,
    /// How the operand read when it was committed, e.g. `√(4)`
    pub text: String,
}

/// Ordered trail of committed operands; renders as `4 × 5 + 2 =`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// Entry index each open parenthesis precedes
    opens: Vec<usize>,
}

impl History {
    pub fn push(&mut self, symbol: &'static str, operand: Number, text: String) {
        self.entries.push(HistoryEntry {
            symbol,
            operand,
            text,
        });
    }

    /// Swap the operator of the most recent entry (`5 + ×` → `5 ×`)
    pub fn replace_symbol(&mut self, symbol: &'static str) -> bool {
        match self.entries.last_mut() {
            Some(e) => {
                e.symbol = symbol;
                true
            }
            None => false,
        }
    }

    /// Start a parenthesized group before the next operand
    pub fn open(&mut self) {
        self.opens.push(self.entries.len());
    }

    /// Fold the innermost group and its last operand `last` into one
    /// operand text, `(3 + 4)`
    pub fn close(&mut self, last: &str) -> String {
        let Some(start) = self.opens.pop() else {
            return last.to_string();
        };
        let body: String = self
            .entries
            .split_off(start.min(self.entries.len()))
            .iter()
            .map(|e| format!("{} {} ", e.text, e.symbol))
            .collect();
        format!("({body}{last})")
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.opens.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.opens.is_empty()
    }

    fn opens_at(&self, index: usize) -> usize {
        self.opens.iter().filter(|o| **o == index).count()
    }

    /// Trail ended by Equals
    pub fn is_complete(&self) -> bool {
        self.entries.last().is_some_and(|e| e.symbol == EQUALS)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Expression text; a pending operator is followed by a space
    pub fn render(&self) -> String {
        let mut text = String::new();
        for (i, e) in self.entries.iter().enumerate() {
            text.push_str(&"(".repeat(self.opens_at(i)));
            text.push_str(&format!("{} {} ", e.text, e.symbol));
        }
        text.push_str(&"(".repeat(self.opens_at(self.entries.len())));
        if self.is_complete() {
            text.truncate(text.trim_end().len());
        }
        text
    }
}

/// Left operand waiting for its right-hand side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending {
    pub value: Number,
    pub op: BinaryOp,
}

pub trait StackOps {
    /// Reduce what `op` may not bind tighter than, then leave `value op`
    /// pending.  Returns the value the reduction produced.
    fn push_operator(
        &mut self,
        value: Number,
        op: BinaryOp,
        ctx: &Context,
        precedence: bool,
    ) -> Result<Number>;

    /// Collapse every pending operator onto `value`
    fn try_fold(&mut self, value: Number, ctx: &Context) -> Result<Number>;

    /// Take back the operator on top and push `op` in its place, reducing
    /// whatever `op` does not bind tighter than.  `None` when nothing is
    /// pending.
    fn replace_operator(
        &mut self,
        op: BinaryOp,
        ctx: &Context,
        precedence: bool,
    ) -> Result<Option<Number>>;

    fn top(&self) -> Option<&Pending>;
}

impl StackOps for Vec<Pending> {
    fn push_operator(
        &mut self,
        value: Number,
        op: BinaryOp,
        ctx: &Context,
        precedence: bool,
    ) -> Result<Number> {
        let mut acc = value;
        while let Some(top) = self.last() {
            if precedence && top.op.precedence() < op.precedence() {
                break;
            }
            acc = top.op.apply(&top.value, &acc, ctx)?;
            self.pop();
        }
        self.push(Pending {
            value: acc.clone(),
            op,
        });
        Ok(acc)
    }

    fn try_fold(&mut self, value: Number, ctx: &Context) -> Result<Number> {
        let mut acc = value;
        while let Some(top) = self.last() {
            acc = top.op.apply(&top.value, &acc, ctx)?;
            self.pop();
        }
        Ok(acc)
    }

    fn replace_operator(
        &mut self,
        op: BinaryOp,
        ctx: &Context,
        precedence: bool,
    ) -> Result<Option<Number>> {
        let Some(top) = self.pop() else {
            return Ok(None);
        };
        self.push_operator(top.value, op, ctx, precedence).map(Some)
    }

    fn top(&self) -> Option<&Pending> {
        self.last()
    }
}
