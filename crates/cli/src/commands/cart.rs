//! Cart commands.
//!
//! The cart is read from the snapshot file when the shop opens and rewritten
//! after every change.

#![allow(clippy::print_stdout)]

use marketstall_core::ProductId;
use marketstall_storefront::cart::LineChange;
use marketstall_storefront::shop::{CartSummary, Intent, Outcome};
use marketstall_storefront::views::CartView;

use super::{CliError, CliShop};

/// Print cart contents and total.
pub async fn show(shop: &CliShop) {
    print!("{}", format_cart(&CartView::from(&shop.cart_summary().await)));
}

pub async fn add(shop: &CliShop, id: ProductId) -> Result<(), CliError> {
    let summary = apply(shop, Intent::AddToCart(id)).await?;
    if summary.change == LineChange::Unchanged {
        println!("Product #{id} is not in the catalog.");
    } else {
        report(id, &summary);
    }
    Ok(())
}

pub async fn increment(shop: &CliShop, id: ProductId) -> Result<(), CliError> {
    let summary = apply(shop, Intent::Increment(id)).await?;
    report(id, &summary);
    Ok(())
}

pub async fn decrement(shop: &CliShop, id: ProductId) -> Result<(), CliError> {
    let summary = apply(shop, Intent::Decrement(id)).await?;
    report(id, &summary);
    Ok(())
}

pub async fn remove(shop: &CliShop, id: ProductId) -> Result<(), CliError> {
    let summary = apply(shop, Intent::Remove(id)).await?;
    report(id, &summary);
    Ok(())
}

async fn apply(shop: &CliShop, intent: Intent) -> Result<CartSummary, CliError> {
    match shop.dispatch(intent).await {
        Outcome::Cart(summary) => Ok(summary),
        Outcome::Unavailable(text) => Err(CliError::Unavailable(text)),
        other => Err(CliError::Unexpected(format!("{other:?}"))),
    }
}

fn report(id: ProductId, summary: &CartSummary) {
    println!("{}", describe_change(id, summary.change));
    println!(
        "Cart: {} items, {}",
        summary.totals.item_count,
        summary.totals.amount_due.display()
    );
}

/// One-line description of a cart change.
pub fn describe_change(id: ProductId, change: LineChange) -> String {
    match change {
        LineChange::Created => format!("Added product #{id}."),
        LineChange::Updated(quantity) => format!("Product #{id} quantity is now {quantity}."),
        LineChange::Removed => format!("Removed product #{id}."),
        LineChange::Unchanged => format!("Product #{id} is not in the cart."),
    }
}

pub fn format_cart(cart: &CartView) -> String {
    if cart.is_empty() {
        return format!("{}\n", cart.empty_text());
    }

    let rows: String = cart
        .items
        .iter()
        .map(|item| {
            format!(
                "{:>4}  {:<33}  {:>3} x {:>9}  {:>10}\n",
                item.id, item.title, item.quantity, item.unit_price, item.line_total
            )
        })
        .collect();
    format!("{rows}{} items, total {}\n", cart.item_count, cart.total)
}
