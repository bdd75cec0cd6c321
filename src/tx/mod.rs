//! Transaction orchestration: intent validation, ERC-20 surface, the send
//! pipeline, and the cross-chain balance sweep.

pub mod balances;
pub mod erc20;
pub mod sender;
pub mod types;

pub use balances::{native_balances, ChainBalance};
pub use sender::TransferSender;
pub use types::{format_amount, parse_amount, SendError, SubmissionResult, TransferIntent};
