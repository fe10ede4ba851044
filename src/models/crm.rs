// src/models/crm.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct CustomerRow {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub town: Option<String>,
    pub balance: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,

    #[schema(example = "Murphy Farm Ltd")]
    pub name: String,

    #[schema(example = "MF")]
    pub initials: String,

    pub email: String,
    pub phone: String,

    #[schema(example = "Ballyporeen, Co. Tipperary")]
    pub address: String,

    #[schema(example = "4250.00")]
    pub balance: Decimal,
}

// Iniciais a partir do nome: primeira letra de cada palavra, máximo 2.
pub fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

impl Customer {
    pub fn from_row(row: CustomerRow) -> Self {
        // Endereço + cidade, sem separador sobrando quando um deles falta.
        let address = [row.address.as_deref(), row.town.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            id: row.id,
            initials: initials_of(&row.name),
            name: row.name,
            email: row.email.unwrap_or_default(),
            phone: row.phone.unwrap_or_default(),
            address,
            balance: row.balance.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iniciais_vem_das_duas_primeiras_palavras() {
        assert_eq!(initials_of("Murphy Farm Ltd"), "MF");
        assert_eq!(initials_of("O'Sullivan"), "O");
        assert_eq!(initials_of(""), "");
    }
}
