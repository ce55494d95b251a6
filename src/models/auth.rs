// src/models/auth.rs

use serde::{Deserialize, Serialize};

// Estrutura de dados ("claims") dentro do JWT.
// Os tokens são emitidos pelo serviço de autenticação do painel; aqui só
// verificamos a assinatura e a expiração.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,          // Subject (ID/login do funcionário)
    #[serde(default)]
    pub role: Option<String>, // Cargo no painel (ex: "admin")
    pub exp: usize,           // Expiration time
    pub iat: usize,           // Issued At
}
