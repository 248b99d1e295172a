//! Static in-memory product catalog

use crate::types::*;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Number of products returned for any query
pub const MAX_MATCHES: usize = 3;

/// Read-only product list, shared across requests
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

pub type SharedCatalog = Arc<Catalog>;

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// First `MAX_MATCHES` entries, used whenever matching yields nothing
    pub fn default_slice(&self) -> &[Product] {
        &self.products[..self.products.len().min(MAX_MATCHES)]
    }

    /// The dispensary menu served by the chat endpoint
    pub fn premo() -> Self {
        Self::new(vec![
            Product {
                id: 1,
                name: "Purple Punch (Indica)".into(),
                description: "22.5% THC. Sweet grape and blueberry notes. Perfect for deep sleep and relaxation. Lab tested.".into(),
                price: "$55/eighth".into(),
                category: "Flower".into(),
                thc_percentage: Some(22.5),
                strain_type: Some(StrainType::Indica),
                effects: tags(&["sleep", "relaxation", "pain relief", "appetite"]),
                terpenes: terps(&[("Myrcene", 0.9), ("Caryophyllene", 0.4), ("Linalool", 0.2)]),
                in_stock: true,
                lab_tested: true,
                ..Default::default()
            },
            Product {
                id: 2,
                name: "Sour Diesel (Sativa)".into(),
                description: "24.8% THC. Energizing diesel aroma. Great for daytime focus and creativity.".into(),
                price: "$60/eighth".into(),
                category: "Flower".into(),
                thc_percentage: Some(24.8),
                strain_type: Some(StrainType::Sativa),
                effects: tags(&["energy", "focus", "creativity", "uplifted"]),
                terpenes: terps(&[("Limonene", 0.7), ("Pinene", 0.5), ("Caryophyllene", 0.3)]),
                in_stock: true,
                lab_tested: true,
                ..Default::default()
            },
            Product {
                id: 3,
                name: "Watermelon THC Gummies".into(),
                description: "10mg THC per piece. 10 gummies per pack. Perfect for precise dosing.".into(),
                price: "$25".into(),
                category: "Edibles".into(),
                thc_mg: Some(100.0),
                effects: tags(&["relaxation", "euphoria", "happy"]),
                in_stock: true,
                lab_tested: true,
                ..Default::default()
            },
            Product {
                id: 4,
                name: "Blue Dream Cartridge".into(),
                description: "85.3% THC distillate. Balanced hybrid for smooth, uplifting effects.".into(),
                price: "$45".into(),
                category: "Vapes".into(),
                thc_percentage: Some(85.3),
                strain_type: Some(StrainType::Hybrid),
                effects: tags(&["balanced", "creative", "relaxed"]),
                terpenes: terps(&[("Myrcene", 0.5), ("Pinene", 0.4)]),
                in_stock: true,
                lab_tested: true,
                ..Default::default()
            },
            Product {
                id: 5,
                name: "Wedding Cake Live Resin".into(),
                description: "78.5% THC concentrate. Premium indica extract for maximum relief.".into(),
                price: "$70".into(),
                category: "Concentrates".into(),
                thc_percentage: Some(78.5),
                strain_type: Some(StrainType::Indica),
                effects: tags(&["relaxation", "euphoria", "sleep"]),
                terpenes: terps(&[("Limonene", 0.8), ("Caryophyllene", 0.6), ("Myrcene", 0.4)]),
                in_stock: true,
                lab_tested: true,
                ..Default::default()
            },
            Product {
                id: 6,
                name: "GSC Pre-Roll Pack".into(),
                description: "21.2% THC. Pack of 5 mini pre-rolls, 0.5g each.".into(),
                price: "$35".into(),
                category: "Pre-rolls".into(),
                thc_percentage: Some(21.2),
                strain_type: Some(StrainType::Hybrid),
                effects: tags(&["happy", "relaxed", "creative"]),
                terpenes: terps(&[("Caryophyllene", 0.6), ("Limonene", 0.4)]),
                in_stock: true,
                lab_tested: true,
                ..Default::default()
            },
            Product {
                id: 7,
                name: "1:1 THC:CBD Tincture".into(),
                description: "Balanced 10mg THC / 10mg CBD per ml. Gentle relief.".into(),
                price: "$65".into(),
                category: "Tinctures".into(),
                thc_mg: Some(300.0),
                cbd_mg: Some(300.0),
                effects: tags(&["balanced", "calm", "pain relief"]),
                in_stock: true,
                lab_tested: true,
                ..Default::default()
            },
            Product {
                id: 8,
                name: "Nighttime THC Gummies".into(),
                description: "10mg THC + 5mg CBN per gummy. Enhanced sleep formula.".into(),
                price: "$30".into(),
                category: "Edibles".into(),
                thc_mg: Some(100.0),
                cbn_mg: Some(50.0),
                effects: tags(&["sleep", "relaxation", "sedating"]),
                in_stock: true,
                lab_tested: true,
                ..Default::default()
            },
            Product {
                id: 9,
                name: "THC Relief Balm".into(),
                description: "200mg THC topical. Direct application for localized relief.".into(),
                price: "$40".into(),
                category: "Topicals".into(),
                thc_mg: Some(200.0),
                effects: tags(&["pain relief", "localized relief"]),
                in_stock: true,
                lab_tested: true,
                ..Default::default()
            },
        ])
    }
}

fn tags(effects: &[&str]) -> Vec<String> {
    effects.iter().map(|e| e.to_string()).collect()
}

fn terps(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}
