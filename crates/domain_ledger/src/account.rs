//! Chart of accounts under SYSCOHADA
//!
//! Account numbers are hierarchical digit strings. The first digit gives the
//! class (1 capital, 2 fixed assets, 3 stocks, 4 third parties, 5 treasury,
//! 6 charges, 7 income, 8 other charges and income, 9 off-balance
//! commitments).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use core_kernel::{AccountId, Amount};
use crate::error::LedgerError;

/// Account class, the first digit of the account number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountClass(u8);

impl AccountClass {
    pub const THIRD_PARTY: AccountClass = AccountClass(4);
    pub const TREASURY: AccountClass = AccountClass(5);

    pub fn new(digit: u8) -> Result<Self, LedgerError> {
        if (1..=9).contains(&digit) {
            Ok(Self(digit))
        } else {
            Err(LedgerError::InvalidAccountNumber(format!("class {} is outside 1-9", digit)))
        }
    }

    /// Derives the class from an account number
    pub fn of(number: &str) -> Result<Self, LedgerError> {
        let first = number
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .ok_or_else(|| LedgerError::InvalidAccountNumber(number.to_string()))?;
        Self::new(first as u8)
    }

    pub fn digit(&self) -> u8 {
        self.0
    }

    /// Classes 1 to 5 appear on the balance sheet
    pub fn is_balance_sheet(&self) -> bool {
        (1..=5).contains(&self.0)
    }

    /// Classes 6 and 7 feed the income statement
    pub fn is_management(&self) -> bool {
        self.0 == 6 || self.0 == 7
    }

    pub fn is_third_party(&self) -> bool {
        *self == Self::THIRD_PARTY
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "Capitaux",
            2 => "Immobilisations",
            3 => "Stocks",
            4 => "Tiers",
            5 => "Trésorerie",
            6 => "Charges",
            7 => "Produits",
            8 => "Autres charges et produits",
            _ => "Engagements hors bilan",
        }
    }
}

impl fmt::Display for AccountClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Side on which an account normally carries its balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceSide {
    Debit,
    Credit,
}

impl BalanceSide {
    /// Converts a signed `debit - credit` balance into one read on this side
    ///
    /// A credit-normal account with more credits than debits reads positive.
    pub fn normalize(&self, signed: Amount) -> Amount {
        match self {
            BalanceSide::Debit => signed,
            BalanceSide::Credit => -signed,
        }
    }
}

/// General ledger account or auxiliary (sub-ledger) account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    General,
    Auxiliary,
}

/// An account in the chart of accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Hierarchical number (e.g., "4722")
    pub number: String,
    pub label: String,
    pub class: AccountClass,
    pub balance_side: BalanceSide,
    pub kind: AccountKind,
    pub parent_id: Option<AccountId>,
    pub description: Option<String>,
    pub is_active: bool,
}

impl Account {
    /// Creates a new general account
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccountNumber` unless the number is all ASCII digits
    /// starting with 1-9.
    pub fn new(
        number: impl Into<String>,
        label: impl Into<String>,
        balance_side: BalanceSide,
    ) -> Result<Self, LedgerError> {
        let number = number.into();
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(LedgerError::InvalidAccountNumber(number));
        }
        let class = AccountClass::of(&number)?;

        Ok(Self {
            id: AccountId::new(),
            number,
            label: label.into(),
            class,
            balance_side,
            kind: AccountKind::General,
            parent_id: None,
            description: None,
            is_active: true,
        })
    }

    /// Marks the account as auxiliary
    pub fn auxiliary(mut self) -> Self {
        self.kind = AccountKind::Auxiliary;
        self
    }

    pub fn with_parent(mut self, parent_id: AccountId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.is_empty() { None } else { Some(description) };
        self
    }

    pub fn is_balance_sheet(&self) -> bool {
        self.class.is_balance_sheet()
    }

    pub fn is_management(&self) -> bool {
        self.class.is_management()
    }

    pub fn is_third_party(&self) -> bool {
        self.class.is_third_party()
    }
}

/// The office chart of accounts, keyed by account number
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    accounts: BTreeMap<String, Account>,
}

impl ChartOfAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account, linking it to the closest existing ancestor
    ///
    /// # Errors
    ///
    /// Returns `AccountAlreadyExists` if the number is taken.
    pub fn add(&mut self, mut account: Account) -> Result<&Account, LedgerError> {
        if self.accounts.contains_key(&account.number) {
            return Err(LedgerError::AccountAlreadyExists(account.number));
        }
        if account.parent_id.is_none() {
            account.parent_id = self.closest_ancestor(&account.number).map(|a| a.id);
        }
        let number = account.number.clone();
        Ok(self.accounts.entry(number).or_insert(account))
    }

    fn closest_ancestor(&self, number: &str) -> Option<&Account> {
        (1..number.len())
            .rev()
            .find_map(|len| self.accounts.get(&number[..len]))
    }

    pub fn get(&self, number: &str) -> Option<&Account> {
        self.accounts.get(number)
    }

    pub fn get_by_id(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.values().find(|a| &a.id == id)
    }

    /// Looks up an account that can receive new lines
    pub fn require_active(&self, number: &str) -> Result<&Account, LedgerError> {
        let account = self
            .get(number)
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))?;
        if !account.is_active {
            return Err(LedgerError::AccountInactive(number.to_string()));
        }
        Ok(account)
    }

    /// Deactivates an account; it stays readable for reports
    pub fn deactivate(&mut self, number: &str) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get_mut(number)
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))?;
        account.is_active = false;
        Ok(())
    }

    /// Accounts in number order
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Accounts of one class
    pub fn by_class(&self, class: AccountClass) -> impl Iterator<Item = &Account> {
        self.accounts.values().filter(move |a| a.class == class)
    }

    /// Direct children of an account
    pub fn children(&self, parent: &AccountId) -> impl Iterator<Item = &Account> + '_ {
        let parent = *parent;
        self.accounts.values().filter(move |a| a.parent_id == Some(parent))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// The SYSCOHADA chart adapted to a bailiff office
    pub fn syscohada_standard() -> Result<Self, LedgerError> {
        let mut chart = Self::new();
        for (number, label, side, description) in STANDARD_ACCOUNTS {
            let mut account = Account::new(*number, *label, *side)?.with_description(*description);
            if number.len() > 3 {
                account = account.auxiliary();
            }
            chart.add(account)?;
        }
        Ok(chart)
    }
}

use BalanceSide::{Credit as C, Debit as D};

/// Number, label, normal side, help text
pub const STANDARD_ACCOUNTS: &[(&str, &str, BalanceSide, &str)] = &[
    ("10", "Capital", C, "Capital social et individuel"),
    ("101", "Capital social", C, "Capital social de l'étude"),
    ("11", "Réserves", C, "Réserves légales et statutaires"),
    ("111", "Réserve légale", C, ""),
    ("12", "Report à nouveau", C, "Résultats non distribués des exercices antérieurs"),
    ("120", "Report à nouveau créditeur", C, ""),
    ("129", "Report à nouveau débiteur", D, ""),
    ("13", "Résultat net de l'exercice", C, ""),
    ("130", "Résultat net: bénéfice", C, ""),
    ("139", "Résultat net: perte", D, ""),
    ("16", "Emprunts et dettes assimilées", C, ""),
    ("162", "Emprunts auprès des établissements de crédit", C, ""),
    ("21", "Immobilisations incorporelles", D, ""),
    ("213", "Logiciels", D, ""),
    ("24", "Matériel", D, ""),
    ("244", "Matériel de bureau", D, "Ordinateurs, imprimantes"),
    ("245", "Matériel de transport", D, "Véhicules de l'étude"),
    ("28", "Amortissements", C, ""),
    ("284", "Amortissements du matériel", C, ""),
    ("31", "Fournitures de bureau", D, ""),
    ("40", "Fournisseurs et comptes rattachés", C, ""),
    ("401", "Fournisseurs", C, "Dettes envers les fournisseurs"),
    ("408", "Fournisseurs - Factures non parvenues", C, ""),
    ("41", "Clients et comptes rattachés", D, ""),
    ("411", "Clients", D, "Créances sur les clients"),
    ("4111", "Clients - Honoraires", D, ""),
    ("4112", "Clients - Émoluments", D, ""),
    ("4113", "Clients - Consignations", D, ""),
    ("419", "Clients créditeurs", C, "Avances et acomptes reçus"),
    ("42", "Personnel", D, ""),
    ("421", "Personnel - Rémunérations dues", C, "Salaires à payer"),
    ("422", "Personnel - Avances et acomptes", D, ""),
    ("43", "Organismes sociaux", C, ""),
    ("431", "CNSS", C, ""),
    ("44", "État et collectivités", C, ""),
    ("443", "État - TVA facturée", C, ""),
    ("4431", "TVA collectée", C, ""),
    ("445", "État - TVA récupérable", D, ""),
    ("4452", "TVA récupérable sur achats", D, ""),
    ("447", "État - Impôts retenus à la source", C, ""),
    ("46", "Débiteurs et créditeurs divers", D, ""),
    ("467", "Débiteurs divers", D, ""),
    ("47", "Comptes transitoires", D, ""),
    ("471", "Comptes d'attente", D, "Opérations en attente de régularisation"),
    ("472", "Consignations", C, "Fonds de consignation des clients"),
    ("4721", "Consignations clients", C, "Fonds consignés par les clients"),
    ("4722", "Consignations à reverser", C, "Montants à reverser aux créanciers"),
    ("52", "Banques", D, ""),
    ("521", "Banques locales", D, ""),
    ("5211", "Banque principale", D, "Compte bancaire principal"),
    ("5212", "Banque secondaire", D, ""),
    ("57", "Caisse", D, ""),
    ("571", "Caisse siège social", D, "Caisse principale"),
    ("58", "Régies d'avances et accréditifs", D, ""),
    ("585", "Régies d'avances", D, "Avances pour frais"),
    ("60", "Achats", D, ""),
    ("601", "Achats de fournitures de bureau", D, ""),
    ("604", "Achats de prestations de services", D, ""),
    ("61", "Services extérieurs", D, ""),
    ("613", "Locations", D, ""),
    ("6131", "Locations immobilières", D, "Loyer des locaux"),
    ("615", "Entretien et réparations", D, ""),
    ("616", "Primes d'assurances", D, ""),
    ("62", "Autres services extérieurs", D, ""),
    ("622", "Rémunérations d'intermédiaires", D, ""),
    ("625", "Déplacements, missions et réceptions", D, ""),
    ("6254", "Frais de carburant", D, "Carburant véhicules"),
    ("626", "Frais postaux et de télécommunications", D, ""),
    ("6261", "Frais postaux", D, ""),
    ("6262", "Téléphone", D, "Téléphone, internet"),
    ("627", "Services bancaires", D, ""),
    ("63", "Impôts et taxes", D, ""),
    ("631", "Impôts et taxes directs", D, ""),
    ("64", "Charges de personnel", D, ""),
    ("641", "Rémunérations du personnel", D, ""),
    ("6411", "Salaires", D, ""),
    ("645", "Charges sociales", D, ""),
    ("65", "Autres charges des activités ordinaires", D, ""),
    ("651", "Pertes sur créances clients", D, "Créances irrécouvrables"),
    ("66", "Charges financières", D, ""),
    ("661", "Intérêts des emprunts", D, ""),
    ("67", "Charges HAO", D, ""),
    ("671", "Intérêts moratoires", D, ""),
    ("68", "Dotations aux amortissements", D, ""),
    ("681", "Dotations aux amortissements", D, ""),
    ("69", "Impôts sur le résultat", D, ""),
    ("691", "Impôts sur les bénéfices", D, ""),
    ("70", "Ventes", C, "Chiffre d'affaires"),
    ("706", "Services vendus", C, "Prestations de services"),
    ("7061", "Honoraires", C, "Honoraires perçus"),
    ("7062", "Émoluments", C, "Émoluments perçus"),
    ("7063", "Frais de recouvrement", C, "Frais de recouvrement perçus"),
    ("7064", "Frais de constat", C, ""),
    ("7065", "Frais de signification", C, "Frais de signification d'actes"),
    ("7068", "Autres prestations", C, ""),
    ("75", "Autres produits", C, ""),
    ("758", "Produits divers", C, ""),
    ("76", "Produits financiers", C, ""),
    ("761", "Intérêts de placements", C, ""),
    ("77", "Produits HAO", C, ""),
    ("83", "Charges hors activités ordinaires", D, ""),
    ("84", "Produits hors activités ordinaires", C, ""),
    ("89", "Impôts sur le résultat", D, ""),
    ("96", "Engagements spécifiques", D, ""),
    ("961", "Consignations à recouvrer", D, "Montants à recouvrer pour le compte de tiers"),
    ("962", "Honoraires à percevoir", D, ""),
    ("97", "Contreparties engagements spécifiques", C, ""),
    ("971", "Contreparties consignations", C, ""),
];
