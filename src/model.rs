//! Typed results of the VIES API operations.
//!
//! Each type carries a `from_doc` constructor that reads its fields from
//! the response document through the generic path extractors in
//! [`crate::xml`], so the single, parsed, batch, and account parsers all
//! share one extraction routine.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::xml::Document;

/// Canonical legal form reported by the parsed-name endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LegalForm {
    Unknown,
    SoleProprietorship,
    LimitedLiabilityCompany,
    GeneralPartnership,
    JointStockCompany,
    LimitedPartnership,
    PrivateLimitedLiabilityCompany,
    SingleMemberJointStockCompany,
    SimpleLimitedLiabilityCompany,
    SingleMemberLimitedLiabilityCompany,
    SimplifiedJointStockCompany,
    SmallCompany,
    LimitedJointStockPartnership,
    ProfessionalPartnership,
    LimitedLiabilityPartnership,
    PrivatePartnership,
    LimitedLiabilityCompanyLimitedPartnership,
    LimitedLiabilityCompanyLimitedJointStockPartnership,
    PublicInstitution,
}

impl LegalForm {
    /// Map the service's numeric canonical id; unknown ids are `Unknown`.
    pub fn from_id(id: i64) -> Self {
        match id {
            1 => Self::SoleProprietorship,
            2 => Self::LimitedLiabilityCompany,
            3 => Self::GeneralPartnership,
            4 => Self::JointStockCompany,
            5 => Self::LimitedPartnership,
            6 => Self::PrivateLimitedLiabilityCompany,
            7 => Self::SingleMemberJointStockCompany,
            8 => Self::SimpleLimitedLiabilityCompany,
            9 => Self::SingleMemberLimitedLiabilityCompany,
            10 => Self::SimplifiedJointStockCompany,
            11 => Self::SmallCompany,
            12 => Self::LimitedJointStockPartnership,
            13 => Self::ProfessionalPartnership,
            14 => Self::LimitedLiabilityPartnership,
            15 => Self::PrivatePartnership,
            16 => Self::LimitedLiabilityCompanyLimitedPartnership,
            17 => Self::LimitedLiabilityCompanyLimitedJointStockPartnership,
            18 => Self::PublicInstitution,
            _ => Self::Unknown,
        }
    }
}

/// Trader name split into structured parts (parsed endpoint only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameComponents {
    pub name: String,
    pub legal_form: String,
    pub legal_form_canonical_id: LegalForm,
    pub legal_form_canonical_name: String,
}

/// Trader address split into structured parts (parsed endpoint only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressComponents {
    pub country: String,
    pub postal_code: String,
    pub city: String,
    pub street: String,
    pub street_number: String,
    pub house_number: String,
}

/// One VAT-check result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViesData {
    pub uid: String,
    pub country_code: String,
    pub vat_number: String,
    pub valid: bool,
    pub trader_name: String,
    /// Present only for the parsed endpoint, and only when the upstream
    /// returned non-empty structured name fields.
    pub trader_name_components: Option<NameComponents>,
    pub trader_company_type: String,
    pub trader_address: String,
    /// Present only for the parsed endpoint, and only when the upstream
    /// returned non-empty structured address fields.
    pub trader_address_components: Option<AddressComponents>,
    pub id: String,
    pub date: Option<DateTime<FixedOffset>>,
    /// Which upstream registry answered (VIES live vs. cached).
    pub source: String,
}

impl ViesData {
    pub(crate) fn from_doc(doc: &Document, base: &str) -> Result<Self, ClientError> {
        let name_components = {
            let nc = NameComponents {
                name: doc.text(&format!("{base}/traderNameComponents/name")),
                legal_form: doc.text(&format!("{base}/traderNameComponents/legalForm")),
                legal_form_canonical_id: LegalForm::from_id(
                    doc.int(&format!("{base}/traderNameComponents/legalFormCanonicalId"))?,
                ),
                legal_form_canonical_name: doc
                    .text(&format!("{base}/traderNameComponents/legalFormCanonicalName")),
            };
            let empty = nc.name.is_empty() && nc.legal_form.is_empty();
            (!empty).then_some(nc)
        };

        let address_components = {
            let ac = AddressComponents {
                country: doc.text(&format!("{base}/traderAddressComponents/country")),
                postal_code: doc.text(&format!("{base}/traderAddressComponents/postalCode")),
                city: doc.text(&format!("{base}/traderAddressComponents/city")),
                street: doc.text(&format!("{base}/traderAddressComponents/street")),
                street_number: doc.text(&format!("{base}/traderAddressComponents/streetNumber")),
                house_number: doc.text(&format!("{base}/traderAddressComponents/houseNumber")),
            };
            let empty = ac.country.is_empty()
                && ac.postal_code.is_empty()
                && ac.city.is_empty()
                && ac.street.is_empty();
            (!empty).then_some(ac)
        };

        Ok(Self {
            uid: doc.text(&format!("{base}/uid")),
            country_code: doc.text(&format!("{base}/countryCode")),
            vat_number: doc.text(&format!("{base}/vatNumber")),
            valid: doc.bool(&format!("{base}/valid")),
            trader_name: doc.text(&format!("{base}/traderName")),
            trader_name_components: name_components,
            trader_company_type: doc.text(&format!("{base}/traderCompanyType")),
            trader_address: doc.text(&format!("{base}/traderAddress")),
            trader_address_components: address_components,
            id: doc.text(&format!("{base}/id")),
            date: doc.date(&format!("{base}/date"))?,
            source: doc.text(&format!("{base}/source")),
        })
    }
}

/// One failed entry of a batch result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViesError {
    pub uid: String,
    pub country_code: String,
    pub vat_number: String,
    pub error: String,
    pub date: Option<DateTime<FixedOffset>>,
    pub source: String,
}

impl ViesError {
    pub(crate) fn from_doc(doc: &Document, base: &str) -> Result<Self, ClientError> {
        Ok(Self {
            uid: doc.text(&format!("{base}/uid")),
            country_code: doc.text(&format!("{base}/countryCode")),
            vat_number: doc.text(&format!("{base}/vatNumber")),
            error: doc.text(&format!("{base}/error")),
            date: doc.date(&format!("{base}/date"))?,
            source: doc.text(&format!("{base}/source")),
        })
    }
}

/// Completed batch: successful checks and per-number failures, both in
/// document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub numbers: Vec<ViesData>,
    pub errors: Vec<ViesError>,
}

impl BatchResult {
    pub(crate) fn from_doc(doc: &Document) -> Result<Self, ClientError> {
        let mut numbers = Vec::new();
        for i in 1.. {
            let base = format!("/result/batch/numbers/vies[{i}]");
            if doc.text(&format!("{base}/uid")).is_empty() {
                break;
            }
            numbers.push(ViesData::from_doc(doc, &base)?);
        }

        let mut errors = Vec::new();
        for i in 1.. {
            let base = format!("/result/batch/errors/error[{i}]");
            if doc.text(&format!("{base}/uid")).is_empty() {
                break;
            }
            errors.push(ViesError::from_doc(doc, &base)?);
        }

        Ok(Self { numbers, errors })
    }
}

/// Account status snapshot: plan attributes and usage counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountStatus {
    pub uid: String,
    pub account_type: String,
    pub valid_to: Option<DateTime<FixedOffset>>,
    pub billing_plan_name: String,

    pub subscription_price: f64,
    pub item_price: f64,
    pub item_price_status: f64,
    pub item_price_parsed: f64,

    pub limit: i64,
    pub request_delay: i64,
    pub domain_limit: i64,
    pub over_plan_allowed: bool,
    pub excel_addin: bool,

    pub app: bool,
    pub cli: bool,
    pub stats: bool,
    pub monitor: bool,

    pub func_get_vies_data: bool,
    pub func_get_vies_data_parsed: bool,

    pub vies_data_count: i64,
    pub vies_data_parsed_count: i64,
    pub total_count: i64,
}

impl AccountStatus {
    pub(crate) fn from_doc(doc: &Document) -> Result<Self, ClientError> {
        let base = "/result/account";
        let plan = "/result/account/billingPlan";
        let requests = "/result/account/requests";

        Ok(Self {
            uid: doc.text(&format!("{base}/uid")),
            account_type: doc.text(&format!("{base}/type")),
            valid_to: doc.date_time(&format!("{base}/validTo"))?,
            billing_plan_name: doc.text(&format!("{plan}/name")),

            subscription_price: doc.float(&format!("{plan}/subscriptionPrice"))?,
            item_price: doc.float(&format!("{plan}/itemPrice"))?,
            item_price_status: doc.float(&format!("{plan}/itemPriceCheckStatus"))?,
            item_price_parsed: doc.float(&format!("{plan}/itemPriceParsed"))?,

            limit: doc.int(&format!("{plan}/limit"))?,
            request_delay: doc.int(&format!("{plan}/requestDelay"))?,
            domain_limit: doc.int(&format!("{plan}/domainLimit"))?,
            over_plan_allowed: doc.bool(&format!("{plan}/overplanAllowed")),
            excel_addin: doc.bool(&format!("{plan}/excelAddin")),

            app: doc.bool(&format!("{plan}/app")),
            cli: doc.bool(&format!("{plan}/cli")),
            stats: doc.bool(&format!("{plan}/stats")),
            monitor: doc.bool(&format!("{plan}/monitor")),

            func_get_vies_data: doc.bool(&format!("{plan}/funcGetVIESData")),
            func_get_vies_data_parsed: doc.bool(&format!("{plan}/funcGetVIESDataParsed")),

            vies_data_count: doc.int(&format!("{requests}/viesData"))?,
            vies_data_parsed_count: doc.int(&format!("{requests}/viesDataParsed"))?,
            total_count: doc.int(&format!("{requests}/total"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(xml: &str) -> Document {
        Document::parse(xml.as_bytes()).unwrap()
    }

    const SINGLE: &str = "<result><vies>\
        <uid>vies-1</uid>\
        <countryCode>PL</countryCode>\
        <vatNumber>7171642051</vatNumber>\
        <valid>true</valid>\
        <traderName>EXAMPLE SP. Z O.O.</traderName>\
        <traderCompanyType>SP. Z O.O.</traderCompanyType>\
        <traderAddress>UL. PRZYKLADOWA 1, 00-001 WARSZAWA</traderAddress>\
        <id>abc-def</id>\
        <date>2022-07-11Z</date>\
        <source>http://ec.europa.eu</source>\
        </vies></result>";

    #[test]
    fn vies_data_from_single_response() {
        let d = doc(SINGLE);
        let vies = ViesData::from_doc(&d, "/result/vies").unwrap();
        assert_eq!(vies.uid, "vies-1");
        assert_eq!(vies.country_code, "PL");
        assert_eq!(vies.vat_number, "7171642051");
        assert!(vies.valid);
        assert_eq!(vies.trader_name, "EXAMPLE SP. Z O.O.");
        assert_eq!(vies.date.unwrap().to_rfc3339(), "2022-07-11T00:00:00+00:00");
        assert!(vies.trader_name_components.is_none());
        assert!(vies.trader_address_components.is_none());
    }

    #[test]
    fn parsed_components_populated_when_present() {
        let d = doc(
            "<result><vies>\
             <uid>vies-2</uid>\
             <valid>true</valid>\
             <traderNameComponents>\
             <name>EXAMPLE</name>\
             <legalForm>SP. Z O.O.</legalForm>\
             <legalFormCanonicalId>2</legalFormCanonicalId>\
             <legalFormCanonicalName>LIMITED LIABILITY COMPANY</legalFormCanonicalName>\
             </traderNameComponents>\
             <traderAddressComponents>\
             <country>PL</country>\
             <postalCode>00-001</postalCode>\
             <city>WARSZAWA</city>\
             <street>PRZYKLADOWA</street>\
             <streetNumber>1</streetNumber>\
             <houseNumber></houseNumber>\
             </traderAddressComponents>\
             </vies></result>",
        );
        let vies = ViesData::from_doc(&d, "/result/vies").unwrap();

        let nc = vies.trader_name_components.unwrap();
        assert_eq!(nc.name, "EXAMPLE");
        assert_eq!(nc.legal_form_canonical_id, LegalForm::LimitedLiabilityCompany);

        let ac = vies.trader_address_components.unwrap();
        assert_eq!(ac.city, "WARSZAWA");
        assert_eq!(ac.house_number, "");
    }

    #[test]
    fn empty_components_stay_none() {
        let d = doc("<result><vies><uid>x</uid><valid>false</valid></vies></result>");
        let vies = ViesData::from_doc(&d, "/result/vies").unwrap();
        assert!(vies.trader_name_components.is_none());
        assert!(vies.trader_address_components.is_none());
        assert!(!vies.valid);
    }

    #[test]
    fn batch_result_preserves_document_order() {
        let d = doc(
            "<result><batch>\
             <numbers>\
             <vies><uid>n1</uid><countryCode>PL</countryCode><valid>true</valid></vies>\
             <vies><uid>n2</uid><countryCode>DE</countryCode><valid>false</valid></vies>\
             </numbers>\
             <errors>\
             <error><uid>e1</uid><countryCode>IT</countryCode>\
             <vatNumber>00000000000</vatNumber><error>Member state unavailable</error>\
             <date>2022-07-11Z</date><source>VIES</source></error>\
             </errors>\
             </batch></result>",
        );
        let batch = BatchResult::from_doc(&d).unwrap();

        assert_eq!(batch.numbers.len(), 2);
        assert_eq!(batch.numbers[0].uid, "n1");
        assert_eq!(batch.numbers[1].uid, "n2");
        assert!(batch.numbers[0].valid);
        assert!(!batch.numbers[1].valid);

        assert_eq!(batch.errors.len(), 1);
        assert_eq!(batch.errors[0].uid, "e1");
        assert_eq!(batch.errors[0].error, "Member state unavailable");
    }

    #[test]
    fn batch_result_handles_empty_sections() {
        let d = doc("<result><batch><numbers/><errors/></batch></result>");
        let batch = BatchResult::from_doc(&d).unwrap();
        assert!(batch.numbers.is_empty());
        assert!(batch.errors.is_empty());
    }

    #[test]
    fn account_status_from_doc() {
        let d = doc(
            "<result><account>\
             <uid>acc-1</uid>\
             <type>Commercial</type>\
             <validTo>2023-01-31T23:59:59+01:00</validTo>\
             <billingPlan>\
             <name>Business</name>\
             <subscriptionPrice>500.00</subscriptionPrice>\
             <itemPrice>0</itemPrice>\
             <itemPriceCheckStatus>0.25</itemPriceCheckStatus>\
             <itemPriceParsed>0.50</itemPriceParsed>\
             <limit>5000</limit>\
             <requestDelay>0</requestDelay>\
             <domainLimit>10</domainLimit>\
             <overplanAllowed>true</overplanAllowed>\
             <excelAddin>true</excelAddin>\
             <app>false</app>\
             <cli>true</cli>\
             <stats>true</stats>\
             <monitor>false</monitor>\
             <funcGetVIESData>true</funcGetVIESData>\
             <funcGetVIESDataParsed>false</funcGetVIESDataParsed>\
             </billingPlan>\
             <requests>\
             <viesData>120</viesData>\
             <viesDataParsed>5</viesDataParsed>\
             <total>125</total>\
             </requests>\
             </account></result>",
        );
        let status = AccountStatus::from_doc(&d).unwrap();

        assert_eq!(status.uid, "acc-1");
        assert_eq!(status.account_type, "Commercial");
        assert_eq!(status.billing_plan_name, "Business");
        assert_eq!(status.subscription_price, 500.0);
        assert_eq!(status.item_price_status, 0.25);
        assert_eq!(status.limit, 5000);
        assert!(status.over_plan_allowed);
        assert!(!status.app);
        assert!(status.func_get_vies_data);
        assert_eq!(status.vies_data_count, 120);
        assert_eq!(status.total_count, 125);
    }

    #[test]
    fn account_status_missing_numeric_fields_decode_as_zero() {
        let d = doc("<result><account><uid>acc-2</uid></account></result>");
        let status = AccountStatus::from_doc(&d).unwrap();
        assert_eq!(status.limit, 0);
        assert_eq!(status.subscription_price, 0.0);
        assert!(status.valid_to.is_none());
    }

    #[test]
    fn legal_form_ids_round_trip() {
        assert_eq!(LegalForm::from_id(0), LegalForm::Unknown);
        assert_eq!(LegalForm::from_id(1), LegalForm::SoleProprietorship);
        assert_eq!(LegalForm::from_id(18), LegalForm::PublicInstitution);
        assert_eq!(LegalForm::from_id(99), LegalForm::Unknown);
        assert_eq!(LegalForm::from_id(-1), LegalForm::Unknown);
    }
}
