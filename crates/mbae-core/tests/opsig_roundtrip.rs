use mbae_core::OpSig;
use proptest::prelude::*;

#[test]
fn diagonal_signature_is_null() {
    let sig = OpSig::encode(0, 0, 0, 0).unwrap();
    assert_eq!(sig, OpSig::DIAGONAL);
    assert!(sig.is_diagonal());
    assert_eq!(sig.as_raw(), 0);
}

#[test]
fn channel_overflow_is_rejected() {
    assert!(OpSig::encode(8, 0, 0, 0).is_none());
    assert!(OpSig::encode(0, 8, 0, 0).is_none());
    assert!(OpSig::encode(0, 0, 4, 0).is_none());
    assert!(OpSig::encode(0, 0, 0, 4).is_none());
}

#[test]
fn classification_helpers() {
    let double = OpSig::frm(2).unwrap();
    assert!(double.is_pure_frm());
    assert!(double.conserves_nfrm());
    assert_eq!(double.nop(), 4);

    let ladder = OpSig::encode(1, 1, 1, 0).unwrap();
    assert!(ladder.takes_bos_ladder());
    assert!(!ladder.is_pure_frm());

    let bos_diag = OpSig::encode(0, 0, 1, 1).unwrap();
    assert!(bos_diag.is_pure_bos());
    assert!(!bos_diag.takes_bos_ladder());
}

#[test]
fn promoted_signature_adds_conserving_pairs() {
    let single = OpSig::frm(1).unwrap();
    assert_eq!(single.promoted(1).unwrap(), OpSig::frm(2).unwrap());
    // promotion past the channel width must be detected, not wrapped
    assert!(OpSig::frm(7).unwrap().promoted(1).is_none());
}

#[test]
fn parse_and_display_agree() {
    for text in ["0000", "1100", "2200", "1111", "0011"] {
        let sig = OpSig::parse(text).unwrap();
        assert_eq!(sig.to_string(), text);
    }
    assert!(OpSig::parse("220").is_none());
    assert!(OpSig::parse("9900").is_none());
    assert!(OpSig::parse("22x0").is_none());
}

proptest! {
    #[test]
    fn encode_decode_round_trip(
        nfrm_cre in 0usize..=7,
        nfrm_ann in 0usize..=7,
        nbos_cre in 0usize..=3,
        nbos_ann in 0usize..=3,
    ) {
        let sig = OpSig::encode(nfrm_cre, nfrm_ann, nbos_cre, nbos_ann).unwrap();
        prop_assert_eq!(sig.nfrm_cre(), nfrm_cre);
        prop_assert_eq!(sig.nfrm_ann(), nfrm_ann);
        prop_assert_eq!(sig.nbos_cre(), nbos_cre);
        prop_assert_eq!(sig.nbos_ann(), nbos_ann);
        prop_assert!(sig.as_raw() < OpSig::NDISTINCT);
        prop_assert_eq!(OpSig::from_raw(sig.as_raw() as u32).unwrap(), sig);
    }
}
