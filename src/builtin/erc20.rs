//! ERC-20 interface with amount-formatting hints

use alloy_primitives::U256;
use anyhow::{anyhow, Context};

use crate::domain::abi::{AbiItem, HintOptions, Param, Value};
use crate::infrastructure::abi::InterfaceEntry;
use crate::utils::format_units;

type HintFn = fn(Option<&Value>, &HintOptions) -> anyhow::Result<String>;

/// Plain ERC-20 interface
pub fn erc20_abi() -> Vec<AbiItem> {
    let view = |name: &str, inputs: Vec<Param>, output: &str| {
        let mut item = AbiItem::function(name, inputs, vec![Param::unnamed(output)]);
        item.state_mutability = Some("view".to_string());
        item
    };
    let transfer_event = |name: &str, a: &str, b: &str| {
        AbiItem::event(
            name,
            vec![
                Param::new(a, "address").indexed(),
                Param::new(b, "address").indexed(),
                Param::new("value", "uint256"),
            ],
        )
    };

    vec![
        view("name", vec![], "string"),
        view("symbol", vec![], "string"),
        view("decimals", vec![], "uint8"),
        view("totalSupply", vec![], "uint256"),
        view("balanceOf", vec![Param::new("owner", "address")], "uint256"),
        view(
            "allowance",
            vec![Param::new("owner", "address"), Param::new("spender", "address")],
            "uint256",
        ),
        AbiItem::function(
            "transfer",
            vec![Param::new("to", "address"), Param::new("value", "uint256")],
            vec![Param::new("success", "bool")],
        ),
        AbiItem::function(
            "transferFrom",
            vec![
                Param::new("from", "address"),
                Param::new("to", "address"),
                Param::new("value", "uint256"),
            ],
            vec![Param::new("success", "bool")],
        ),
        AbiItem::function(
            "approve",
            vec![Param::new("spender", "address"), Param::new("value", "uint256")],
            vec![Param::new("success", "bool")],
        ),
        transfer_event("Transfer", "from", "to"),
        transfer_event("Approval", "owner", "spender"),
    ]
}

/// ERC-20 interface with hints on transfers and approvals
pub fn erc20() -> Vec<InterfaceEntry> {
    erc20_abi()
        .into_iter()
        .map(|item| {
            let hint: Option<HintFn> = match (item.is_event(), item.name.as_str()) {
                (false, "transfer") => Some(transfer_hint),
                (false, "transferFrom") | (true, "Transfer") => Some(transfer_from_hint),
                (false, "approve") => Some(approve_hint),
                (true, "Approval") => Some(approval_event_hint),
                _ => None,
            };
            let entry = InterfaceEntry::new(item);
            match hint {
                Some(hint) => entry.with_hint(hint),
                None => entry,
            }
        })
        .collect()
}

fn transfer_hint(value: Option<&Value>, opts: &HintOptions) -> anyhow::Result<String> {
    let amount = amount(value, opts)?;
    Ok(format!("Transfer {} to {}", amount, field(value, "to")?))
}

fn transfer_from_hint(value: Option<&Value>, opts: &HintOptions) -> anyhow::Result<String> {
    let amount = amount(value, opts)?;
    Ok(format!(
        "Transfer {} from {} to {}",
        amount,
        field(value, "from")?,
        field(value, "to")?
    ))
}

fn approve_hint(value: Option<&Value>, opts: &HintOptions) -> anyhow::Result<String> {
    let amount = amount(value, opts)?;
    Ok(format!("Allow spending {} by {}", amount, field(value, "spender")?))
}

fn approval_event_hint(value: Option<&Value>, opts: &HintOptions) -> anyhow::Result<String> {
    let amount = amount(value, opts)?;
    Ok(format!(
        "Allow {} spending up to {} from {}",
        field(value, "spender")?,
        amount,
        field(value, "owner")?
    ))
}

fn field<'a>(value: Option<&'a Value>, name: &str) -> anyhow::Result<&'a Value> {
    value
        .and_then(|v| v.get(name))
        .ok_or_else(|| anyhow!("missing field `{}`", name))
}

/// Token amount rendered with the contract's decimals and symbol
fn amount(value: Option<&Value>, opts: &HintOptions) -> anyhow::Result<String> {
    let info = opts.info().context("unknown token contract")?;
    let decimals = info.decimals.context("token decimals unknown")?;
    let symbol = info.symbol.as_deref().context("token symbol unknown")?;
    let raw = field(value, "value")?
        .as_uint()
        .context("amount is not an unsigned integer")?;
    if raw == U256::MAX {
        return Ok(format!("unlimited {}", symbol));
    }
    Ok(format!("{} {}", format_units(raw, u32::from(decimals)), symbol))
}
