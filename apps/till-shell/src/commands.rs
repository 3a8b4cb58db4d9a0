//! # Shell Commands
//!
//! Parsing of input lines and their dispatch to [`BasketService`].
//!
//! ## Command Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Line                           Service call              Reply         │
//! │  ────                           ────────────              ─────         │
//! │  create                         create_basket()           BasketView    │
//! │  get <basket>                   get_basket(id)            BasketView    │
//! │  remove <basket>                remove_basket(id)         {removed}     │
//! │  add <basket> <code>            add_product(id, code)     BasketView    │
//! │  delete-product <basket> <code> remove_product(id, code)  BasketView    │
//! │  checkout <basket>              checkout_basket(id)       BasketView    │
//! │  item <basket> <code>           get_item(id, code)        LineItemView  │
//! │  products                       catalog()                 [Product]     │
//! │  rules                          rules()                   {name: rule}  │
//! │  help, quit                     (handled by the loop)                   │
//! │  anything else                  -                         InvalidCommand│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use till_core::{Product, RuleDefinition};
use till_service::{BasketService, BasketView, LineItemView, ServiceResult};
use till_store::BasketStore;

pub const HELP: &str = "\
commands:
  create
  get <basket>
  remove <basket>
  add <basket> <product>
  delete-product <basket> <product>
  checkout <basket>
  item <basket> <product>
  products
  rules
  help
  quit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Command(Command),
    Help,
    Quit,
}

/// A request for the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create,
    Get { basket: String },
    Remove { basket: String },
    Add { basket: String, product: String },
    DeleteProduct { basket: String, product: String },
    Checkout { basket: String },
    Item { basket: String, product: String },
    Products,
    Rules,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// What the shell prints for a line it cannot parse. Same shape as
/// [`till_service::ErrorResponse`], with its own code.
///
/// ```json
/// { "code": "INVALID_COMMAND", "message": "Unknown command: refund" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidCommand {
    pub code: &'static str,
    pub message: String,
}

impl From<&ParseError> for InvalidCommand {
    fn from(err: &ParseError) -> Self {
        InvalidCommand {
            code: "INVALID_COMMAND",
            message: err.to_string(),
        }
    }
}

impl FromStr for Line {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            return Err(ParseError::Empty);
        };

        let command = match (name.to_lowercase().as_str(), args) {
            ("create", []) => Command::Create,
            ("get", [basket]) => Command::Get {
                basket: basket.to_string(),
            },
            ("remove", [basket]) => Command::Remove {
                basket: basket.to_string(),
            },
            ("add", [basket, product]) => Command::Add {
                basket: basket.to_string(),
                product: product.to_string(),
            },
            ("delete-product", [basket, product]) => Command::DeleteProduct {
                basket: basket.to_string(),
                product: product.to_string(),
            },
            ("checkout", [basket]) => Command::Checkout {
                basket: basket.to_string(),
            },
            ("item", [basket, product]) => Command::Item {
                basket: basket.to_string(),
                product: product.to_string(),
            },
            ("products", []) => Command::Products,
            ("rules", []) => Command::Rules,
            ("help", _) => return Ok(Line::Help),
            ("quit" | "exit", _) => return Ok(Line::Quit),

            ("create", _) => return Err(ParseError::Usage("create")),
            ("get", _) => return Err(ParseError::Usage("get <basket>")),
            ("remove", _) => return Err(ParseError::Usage("remove <basket>")),
            ("add", _) => return Err(ParseError::Usage("add <basket> <product>")),
            ("delete-product", _) => {
                return Err(ParseError::Usage("delete-product <basket> <product>"))
            }
            ("checkout", _) => return Err(ParseError::Usage("checkout <basket>")),
            ("item", _) => return Err(ParseError::Usage("item <basket> <product>")),
            ("products", _) => return Err(ParseError::Usage("products")),
            ("rules", _) => return Err(ParseError::Usage("rules")),
            (other, _) => return Err(ParseError::Unknown(other.to_string())),
        };

        Ok(Line::Command(command))
    }
}

/// What a successful command prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Basket(BasketView),
    Item(LineItemView),
    Removed { removed: String },
    Products(Vec<Product>),
    Rules(BTreeMap<String, RuleDefinition>),
}

/// Runs a command against the service.
pub fn execute<S: BasketStore>(service: &BasketService<S>, command: &Command) -> ServiceResult<Reply> {
    let reply = match command {
        Command::Create => Reply::Basket(service.create_basket()?.into()),
        Command::Get { basket } => Reply::Basket(service.get_basket(basket)?.into()),
        Command::Remove { basket } => {
            service.remove_basket(basket)?;
            Reply::Removed {
                removed: basket.clone(),
            }
        }
        Command::Add { basket, product } => {
            Reply::Basket(service.add_product(basket, product)?.into())
        }
        Command::DeleteProduct { basket, product } => {
            Reply::Basket(service.remove_product(basket, product)?.into())
        }
        Command::Checkout { basket } => Reply::Basket(service.checkout_basket(basket)?.into()),
        Command::Item { basket, product } => {
            Reply::Item(LineItemView::from(&service.get_item(basket, product)?))
        }
        Command::Products => Reply::Products(service.catalog().iter().cloned().collect()),
        Command::Rules => Reply::Rules(
            service
                .rules()
                .iter()
                .map(|rule| (rule.name.clone(), RuleDefinition::from(rule)))
                .collect(),
        ),
    };

    Ok(reply)
}
