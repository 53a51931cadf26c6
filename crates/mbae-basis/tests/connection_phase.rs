use mbae_basis::{FrmBasis, FrmConn, FrmOnv, FrmOps};
use mbae_core::OpSig;

fn onv(nsite: usize, occ: &[usize]) -> FrmOnv {
    FrmOnv::from_occ(FrmBasis::new(nsite), occ).unwrap()
}

#[test]
fn diagonal_connection_is_null_with_no_phase() {
    let src = onv(5, &[1, 3, 4, 6, 7, 9]);
    let mut conn = FrmConn::new(src.basis());
    let mut com = FrmOps::new(src.basis().nspinorb());
    let phase = conn.connect_with_com(&src, &src, &mut com).unwrap();
    assert_eq!(conn.size(), 0);
    assert_eq!(conn.exsig().unwrap(), OpSig::DIAGONAL);
    assert!(!phase);
    assert!(!conn.phase(&src));
    assert_eq!(com.as_slice(), &[1, 3, 4, 6, 7, 9]);
}

#[test]
fn single_excitation_through_three_occupied_is_negative() {
    // 3 -> 8 moves past the occupied spin-orbitals 4, 6 and 7
    let src = onv(5, &[1, 3, 4, 6, 7, 9]);
    let dst = onv(5, &[1, 4, 6, 7, 8, 9]);
    let mut conn = FrmConn::new(src.basis());
    let mut com = FrmOps::new(src.basis().nspinorb());
    let phase = conn.connect_with_com(&src, &dst, &mut com).unwrap();
    assert_eq!(conn.ann().as_slice(), &[3]);
    assert_eq!(conn.cre().as_slice(), &[8]);
    assert_eq!(com.as_slice(), &[1, 4, 6, 7, 9]);
    assert!(phase);
    assert!(conn.phase(&src));
}

#[test]
fn merge_scan_phase_agrees_with_prefix_parity_phase() {
    let cases: &[(&[usize], &[usize])] = &[
        (&[0, 1], &[2, 3]),
        (&[0, 3], &[1, 2]),
        (&[0, 2, 5], &[1, 2, 7]),
        (&[1, 3, 4, 6, 7, 9], &[0, 3, 4, 6, 7, 8]),
    ];
    for &(src_occ, dst_occ) in cases {
        let src = onv(5, src_occ);
        let dst = onv(5, dst_occ);
        let mut conn = FrmConn::new(src.basis());
        let mut com = FrmOps::new(src.basis().nspinorb());
        let merge_phase = conn.connect_with_com(&src, &dst, &mut com).unwrap();
        assert_eq!(merge_phase, conn.phase(&src), "case {src_occ:?} -> {dst_occ:?}");
    }
}

#[test]
fn apply_reproduces_destination_and_common_string() {
    let src = onv(5, &[1, 3, 4, 6, 7, 9]);
    let dst = onv(5, &[1, 4, 6, 7, 8, 9]);
    let mut conn = FrmConn::new(src.basis());
    conn.connect(&src, &dst).unwrap();

    let mut applied = FrmOnv::zero(src.basis());
    conn.apply(&src, &mut applied);
    assert_eq!(applied, dst);

    let mut com = FrmOps::new(src.basis().nspinorb());
    let phase = conn.apply_com(&src, &mut com);
    assert_eq!(com.as_slice(), &[1, 4, 6, 7, 9]);
    assert!(phase);
}

#[test]
fn phase_is_symmetric_under_endpoint_interchange() {
    let src = onv(5, &[1, 3, 4, 6, 7, 9]);
    let dst = onv(5, &[0, 2, 4, 6, 8, 9]);
    let mut fwd = FrmConn::new(src.basis());
    let mut rev = FrmConn::new(src.basis());
    fwd.connect(&src, &dst).unwrap();
    rev.connect(&dst, &src).unwrap();
    assert_eq!(fwd.phase(&src), rev.phase(&dst));
}

#[test]
fn promoted_signature_inserts_spectator_pairs_until_overflow() {
    let src = onv(5, &[1, 3, 4, 6, 7, 9]);
    let dst = onv(5, &[1, 4, 6, 7, 8, 9]);
    let mut conn = FrmConn::new(src.basis());
    conn.connect(&src, &dst).unwrap();
    assert_eq!(conn.exsig_promoted(0), conn.exsig());
    assert_eq!(conn.exsig_promoted(1), OpSig::frm(2));
    assert_eq!(conn.exsig_promoted(OpSig::MAX_NFRM - 1), OpSig::frm(OpSig::MAX_NFRM));
    assert_eq!(conn.exsig_promoted(OpSig::MAX_NFRM), None);
}

#[test]
fn capacity_mismatch_is_rejected_unconditionally() {
    let src = onv(4, &[0, 1]);
    let dst = onv(5, &[0, 1]);
    let mut conn = FrmConn::new(src.basis());
    let err = conn.connect(&src, &dst).unwrap_err();
    assert_eq!(err.info().code, "frm-capacity-mismatch");
}

#[test]
fn connection_strings_are_disjoint_from_common_string() {
    let src = onv(5, &[0, 2, 5, 6]);
    let dst = onv(5, &[1, 2, 6, 9]);
    let mut conn = FrmConn::new(src.basis());
    let mut com = FrmOps::new(src.basis().nspinorb());
    conn.connect_with_com(&src, &dst, &mut com).unwrap();
    for &i in com.as_slice() {
        assert!(!conn.cre().as_slice().contains(&i));
        assert!(!conn.ann().as_slice().contains(&i));
    }
    assert_eq!(com.len() + conn.ann().len(), src.nsetbit());
}
