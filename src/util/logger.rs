use std::fmt::{Display, Formatter};

use super::{Code, Log};

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    /// Function which return order of the log.
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl<TL: Display> Log<TL> {
    /// Print a rule-invocation trace line if `self`'s level allows it. A
    /// no-op outside debug builds; `outcome` is produced lazily by the
    /// caller only when it will actually be printed.
    #[allow(unused_variables)]
    pub fn trace_entry(&self, code: &Code, pos: usize) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Default(()).order() {
            println!("[{}; enter] at {}", self, code.obtain_position(pos));
        }
    }

    #[allow(unused_variables)]
    pub fn trace_result(&self, code: &Code, pos: usize, matched: bool, end: usize) {
        #[cfg(debug_assertions)]
        {
            if matched && self.order() >= Log::Success(()).order() {
                println!(
                    "[{}; match] {} -> {}",
                    self,
                    code.obtain_position(pos),
                    code.obtain_position(end)
                );
            } else if !matched && self.order() >= Log::Result(()).order() {
                println!("[{}; fail] at {}", self, code.obtain_position(pos));
            }
        }
    }

    /// Same as [Log::trace_entry]/[Log::trace_result] but keyed to a plain
    /// token index rather than a byte offset — the evaluator (§4.3) has no
    /// source buffer of its own, only a [crate::eval::TokenStream].
    #[allow(unused_variables)]
    pub fn trace_rule_entry(&self, rule: &str, pos: usize) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Default(()).order() {
            println!("[{}; enter] {} at token {}", self, rule, pos);
        }
    }

    #[allow(unused_variables)]
    pub fn trace_rule_result(&self, rule: &str, pos: usize, matched: bool, end: usize) {
        #[cfg(debug_assertions)]
        {
            if matched && self.order() >= Log::Success(()).order() {
                println!("[{}; match] {} {} -> {}", self, rule, pos, end);
            } else if !matched && self.order() >= Log::Result(()).order() {
                println!("[{}; fail] {} at token {}", self, rule, pos);
            }
        }
    }

    #[allow(unused_variables)]
    pub fn trace_seed_grow(&self, rule: &str, pos: usize, end: usize) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Verbose(()).order() {
            println!("[{}; grow] {} at {} seed now reaches {}", self, rule, pos, end);
        }
    }
}
