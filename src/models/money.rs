// src/models/money.rs

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Part,
    Labor,
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Part => "part",
            ItemKind::Labor => "labor",
        }
    }
}

// --- Structs ---

// Uma linha precificada de um Job ou Orçamento (peça ou bloco de mão de obra).
// Invariante: `total` é sempre quantity * unit_price, arredondado; nunca é
// definido de forma independente. Construa sempre via `LineItem::new`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[schema(example = "part-0")]
    pub id: String,

    #[schema(example = "Vacuum Pump Oil (5L)")]
    pub description: String,

    #[schema(example = "2.0")]
    pub quantity: Decimal,

    #[schema(example = "45.00")]
    pub unit_price: Decimal,

    #[schema(example = "90.00")]
    pub total: Decimal,

    #[serde(rename = "type")]
    pub kind: ItemKind,

    pub product_id: Option<Uuid>,
}

impl LineItem {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        kind: ItemKind,
        product_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            quantity,
            unit_price,
            total: round2(quantity * unit_price),
            kind,
            product_id,
        }
    }
}

// Decomposição de um valor em subtotal + IVA + total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VatBreakdown {
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub total: Decimal,
}

// --- Regras de dinheiro ---
// Somas intermediárias mantêm a precisão cheia; o arredondamento para
// 2 casas acontece nos pontos de exibição/gravação.

pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn subtotal(items: &[LineItem]) -> Decimal {
    round2(items.iter().map(|i| i.total).sum())
}

pub fn vat_amount(subtotal: Decimal, rate_percent: Decimal) -> Decimal {
    round2(subtotal * rate_percent / Decimal::ONE_HUNDRED)
}

pub fn grand_total(subtotal: Decimal, vat: Decimal) -> Decimal {
    round2(subtotal + vat)
}

// Caminho direto: itens -> subtotal -> IVA -> total.
pub fn breakdown_from_items(items: &[LineItem], rate_percent: Decimal) -> VatBreakdown {
    let sub = subtotal(items);
    let vat = vat_amount(sub, rate_percent);
    VatBreakdown {
        subtotal: sub,
        vat_amount: vat,
        total: grand_total(sub, vat),
    }
}

// Caminho inverso (fatura do contador): o total vem do caller e o
// subtotal/IVA são derivados dele, de modo que as três parcelas sempre
// fecham com o total informado.
pub fn breakdown_from_total(total_amount: Decimal, rate_percent: Decimal) -> VatBreakdown {
    let divisor = Decimal::ONE + rate_percent / Decimal::ONE_HUNDRED;
    let sub = round2(total_amount / divisor);
    VatBreakdown {
        subtotal: sub,
        vat_amount: total_amount - sub,
        total: total_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn total_e_sempre_produto_arredondado() {
        let item = LineItem::new("i", "Liner", dec!(3), dec!(33.333), ItemKind::Part, None);
        assert_eq!(item.total, dec!(100.00));
    }

    #[test]
    fn quantidade_zero_ou_negativa_nao_e_rejeitada() {
        let zero = LineItem::new("z", "x", dec!(0), dec!(10), ItemKind::Part, None);
        assert_eq!(zero.total, dec!(0));

        let neg = LineItem::new("n", "estorno", dec!(-1), dec!(10), ItemKind::Part, None);
        assert_eq!(neg.total, dec!(-10));
    }

    #[test]
    fn cenario_pecas_mais_mao_de_obra() {
        // 1 peça (qty 2 a 45.00) + 3 horas a 60 -> subtotal 270.00,
        // IVA 13.5% = 36.45, total 306.45.
        let items = vec![
            LineItem::new("part-0", "Pump", dec!(2), dec!(45.00), ItemKind::Part, None),
            LineItem::new("labor-item", "Labor Hours", dec!(3), dec!(60), ItemKind::Labor, None),
        ];
        let b = breakdown_from_items(&items, dec!(13.5));
        assert_eq!(b.subtotal, dec!(270.00));
        assert_eq!(b.vat_amount, dec!(36.45));
        assert_eq!(b.total, dec!(306.45));
    }

    #[test]
    fn caminho_inverso_fecha_com_o_total_informado() {
        let b = breakdown_from_total(dec!(306.45), dec!(13.5));
        assert!((b.subtotal - dec!(270.00)).abs() <= dec!(0.01));
        assert!((b.vat_amount - dec!(36.45)).abs() <= dec!(0.01));
        assert_eq!(b.subtotal + b.vat_amount, b.total);
    }

    #[test]
    fn caminho_inverso_com_taxa_zero() {
        let b = breakdown_from_total(dec!(100.00), dec!(0));
        assert_eq!(b.subtotal, dec!(100.00));
        assert_eq!(b.vat_amount, dec!(0.00));
    }

    #[test]
    fn lista_vazia_produz_zeros() {
        let b = breakdown_from_items(&[], dec!(13.5));
        assert_eq!(b.subtotal, dec!(0));
        assert_eq!(b.vat_amount, dec!(0));
        assert_eq!(b.total, dec!(0));
    }
}
