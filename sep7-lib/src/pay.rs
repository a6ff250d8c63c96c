//! The `pay` request.
//!
//! A request to pay a specific destination, optionally pinning amount, asset
//! and memo. All optional fields are derived eagerly at construction so a
//! malformed request fails before anything is shown to a user.

use std::ops::Deref;

use crate::uri::Sep7Uri;
use crate::{Asset, Memo, Result, Sep7Error};

/// A parsed `pay` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayRequest {
    uri: Sep7Uri,
    destination: String,
    amount: Option<String>,
    asset: Option<Asset>,
    memo: Option<Memo>,
}

impl PayRequest {
    /// Parse a `pay` request from a URI string.
    pub fn parse(input: &str) -> Result<Self> {
        Self::from_uri(Sep7Uri::parse(input)?)
    }

    /// Derive the typed request from an already-parsed entity.
    pub(crate) fn from_uri(uri: Sep7Uri) -> Result<Self> {
        let destination = uri
            .get("destination")
            .map(str::to_string)
            .ok_or(Sep7Error::MissingRequiredField("destination"))?;
        let amount = uri.get("amount").map(str::to_string);

        let asset = match (uri.get("asset_code"), uri.get("asset_issuer")) {
            (Some(code), Some(issuer)) => Some(Asset::issued(code, issuer)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(Sep7Error::malformed(
                    "asset_issuer",
                    "asset_code given without asset_issuer",
                ))
            }
            (None, Some(_)) => {
                return Err(Sep7Error::malformed(
                    "asset_code",
                    "asset_issuer given without asset_code",
                ))
            }
        };

        // An absent or empty memo value means "no memo" no matter what
        // memo_type says.
        let memo = match uri.get("memo") {
            None | Some("") => None,
            Some(value) => Some(Memo::from_params(uri.get("memo_type"), value)?),
        };

        Ok(Self {
            uri,
            destination,
            amount,
            asset,
            memo,
        })
    }

    /// The underlying request URI.
    pub fn uri(&self) -> &Sep7Uri {
        &self.uri
    }

    /// Consume the request, yielding the underlying URI.
    pub fn into_uri(self) -> Sep7Uri {
        self.uri
    }

    /// The account to be paid.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// The requested amount, if the request pins one.
    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    /// The requested asset. `None` means the native asset.
    pub fn asset(&self) -> Option<&Asset> {
        self.asset.as_ref()
    }

    /// The memo to attach, if any.
    pub fn memo(&self) -> Option<&Memo> {
        self.memo.as_ref()
    }

    /// Build a payment operation for this request.
    ///
    /// The amount comes from the argument, falling back to the request's
    /// own; with neither, this fails with
    /// [`Sep7Error::MissingBuildOption`].
    pub fn payment(&self, amount: Option<&str>) -> Result<PaymentOperation> {
        let amount = amount
            .map(str::to_string)
            .or_else(|| self.amount.clone())
            .ok_or(Sep7Error::MissingBuildOption("amount"))?;
        Ok(PaymentOperation {
            destination: self.destination.clone(),
            asset: self.asset.clone().unwrap_or(Asset::Native),
            amount,
        })
    }

    /// Build a path-payment (strict receive) operation for this request.
    ///
    /// The destination amount comes from the options, falling back to the
    /// request's own amount. Setting `send_asset` without `send_max` is an
    /// error; a capped conversion needs its cap.
    pub fn path_payment(&self, options: &PathPaymentOptions) -> Result<PathPaymentOperation> {
        let dest_amount = options
            .dest_amount
            .clone()
            .or_else(|| self.amount.clone())
            .ok_or(Sep7Error::MissingBuildOption("dest_amount"))?;
        if options.send_asset.is_some() && options.send_max.is_none() {
            return Err(Sep7Error::MissingBuildOption("send_max"));
        }
        Ok(PathPaymentOperation {
            destination: self.destination.clone(),
            dest_asset: self.asset.clone().unwrap_or(Asset::Native),
            dest_amount,
            send_asset: options.send_asset.clone(),
            send_max: options.send_max.clone(),
        })
    }
}

impl Deref for PayRequest {
    type Target = Sep7Uri;

    fn deref(&self) -> &Sep7Uri {
        &self.uri
    }
}

impl std::fmt::Display for PayRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

/// A plain payment operation derived from a `pay` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentOperation {
    /// The account to be paid.
    pub destination: String,
    /// The asset to pay in.
    pub asset: Asset,
    /// The amount to pay.
    pub amount: String,
}

/// Caller-supplied options for [`PayRequest::path_payment`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathPaymentOptions {
    /// The asset the payer sends. The payee still receives the request's
    /// asset.
    pub send_asset: Option<Asset>,
    /// Upper bound on what the payer is willing to spend. Mandatory when
    /// `send_asset` is set.
    pub send_max: Option<String>,
    /// Overrides the request's amount as the received amount.
    pub dest_amount: Option<String>,
}

/// A path-payment (strict receive) operation derived from a `pay` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathPaymentOperation {
    /// The account to be paid.
    pub destination: String,
    /// The asset the destination receives.
    pub dest_asset: Asset,
    /// The amount the destination receives.
    pub dest_amount: String,
    /// The asset the payer sends, if pinned.
    pub send_asset: Option<Asset>,
    /// The payer's spending cap, if any.
    pub send_max: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pay(uri: &str) -> Result<PayRequest> {
        PayRequest::parse(uri)
    }

    #[test]
    fn test_destination_is_required() {
        assert!(matches!(
            pay("web+stellar:pay?amount=10").unwrap_err(),
            Sep7Error::MissingRequiredField("destination")
        ));
    }

    #[test]
    fn test_minimal_request_is_native_with_no_memo() {
        let request = pay("web+stellar:pay?destination=GABC").unwrap();
        assert_eq!(request.destination(), "GABC");
        assert_eq!(request.amount(), None);
        assert_eq!(request.asset(), None);
        assert_eq!(request.memo(), None);
    }

    #[test]
    fn test_issued_asset_needs_both_parameters() {
        let request =
            pay("web+stellar:pay?destination=GABC&asset_code=USD&asset_issuer=GISSUER").unwrap();
        assert_eq!(request.asset(), Some(&Asset::issued("USD", "GISSUER")));

        assert!(pay("web+stellar:pay?destination=GABC&asset_code=USD").is_err());
        assert!(pay("web+stellar:pay?destination=GABC&asset_issuer=GISSUER").is_err());
    }

    #[test]
    fn test_memo_decoding() {
        let request =
            pay("web+stellar:pay?destination=GABC&memo=order+42&memo_type=MEMO_TEXT").unwrap();
        assert_eq!(request.memo(), Some(&Memo::Text("order 42".to_string())));

        let request =
            pay("web+stellar:pay?destination=GABC&memo=42&memo_type=MEMO_ID").unwrap();
        assert_eq!(request.memo(), Some(&Memo::Id(42)));

        // Empty value: no memo, whatever memo_type claims.
        let request =
            pay("web+stellar:pay?destination=GABC&memo=&memo_type=MEMO_ID").unwrap();
        assert_eq!(request.memo(), None);

        // Present value without a usable type fails construction.
        assert!(pay("web+stellar:pay?destination=GABC&memo=42").is_err());
        assert!(pay("web+stellar:pay?destination=GABC&memo=42&memo_type=MEMO_NONE").is_err());
    }

    #[test]
    fn test_payment_amount_precedence() {
        let request = pay("web+stellar:pay?destination=GABC&amount=10").unwrap();

        let from_uri = request.payment(None).unwrap();
        assert_eq!(from_uri.amount, "10");
        assert_eq!(from_uri.asset, Asset::Native);
        assert_eq!(from_uri.destination, "GABC");

        let overridden = request.payment(Some("25")).unwrap();
        assert_eq!(overridden.amount, "25");

        let bare = pay("web+stellar:pay?destination=GABC").unwrap();
        assert!(matches!(
            bare.payment(None).unwrap_err(),
            Sep7Error::MissingBuildOption("amount")
        ));
        assert_eq!(bare.payment(Some("5")).unwrap().amount, "5");
    }

    #[test]
    fn test_path_payment_requires_send_max_with_send_asset() {
        let request = pay("web+stellar:pay?destination=GABC&amount=10").unwrap();

        let options = PathPaymentOptions {
            send_asset: Some(Asset::issued("EUR", "GEUR")),
            send_max: None,
            dest_amount: None,
        };
        assert!(matches!(
            request.path_payment(&options).unwrap_err(),
            Sep7Error::MissingBuildOption("send_max")
        ));

        let options = PathPaymentOptions {
            send_asset: Some(Asset::issued("EUR", "GEUR")),
            send_max: Some("12".to_string()),
            dest_amount: None,
        };
        let operation = request.path_payment(&options).unwrap();
        assert_eq!(operation.dest_amount, "10");
        assert_eq!(operation.send_max.as_deref(), Some("12"));
    }

    #[test]
    fn test_path_payment_amount_precedence() {
        let request = pay("web+stellar:pay?destination=GABC").unwrap();

        assert!(matches!(
            request.path_payment(&PathPaymentOptions::default()).unwrap_err(),
            Sep7Error::MissingBuildOption("dest_amount")
        ));

        let options = PathPaymentOptions {
            dest_amount: Some("7".to_string()),
            ..Default::default()
        };
        assert_eq!(request.path_payment(&options).unwrap().dest_amount, "7");
    }

    #[test]
    fn test_base_entity_is_reachable() {
        let request =
            pay("web+stellar:pay?destination=GABC&msg=please&origin_domain=example.com").unwrap();
        assert_eq!(request.msg(), Some("please"));
        assert_eq!(request.origin_domain(), Some("example.com"));
        assert_eq!(request.operation(), "pay");
    }
}
