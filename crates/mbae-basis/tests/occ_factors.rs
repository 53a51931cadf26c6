use mbae_basis::bos_onv::{occ_fac_square_ann, occ_fac_square_com, occ_fac_square_cre};
use mbae_basis::{BosBasis, BosConn, BosOnv, BosOps};

fn onv(occ: &[u32]) -> BosOnv {
    BosOnv::from_occ(BosBasis::new(occ.len(), 8), occ).unwrap()
}

#[test]
fn single_mode_factors_match_ladder_matrix_elements() {
    // <n-1| b |n> = sqrt(n), <n+1| b+ |n> = sqrt(n+1)
    assert_eq!(occ_fac_square_ann(3, 1), 3);
    assert_eq!(occ_fac_square_cre(3, 1), 4);
    // falling and rising factorials for higher-rank products
    assert_eq!(occ_fac_square_ann(4, 2), 12);
    assert_eq!(occ_fac_square_cre(2, 3), 60);
    // annihilating below vacuum destroys the state
    assert_eq!(occ_fac_square_ann(1, 2), 0);
    // common pairs contribute squared falling factors
    assert_eq!(occ_fac_square_com(3, 2), 36);
    assert_eq!(occ_fac_square_com(2, 0), 1);
}

#[test]
fn connection_factor_multiplies_over_modes() {
    let src = onv(&[2, 0, 3]);
    let dst = onv(&[1, 1, 3]);
    let mut conn = BosConn::new(3);
    conn.connect(&src, &dst).unwrap();
    // ann on mode 0 (occ 2) and cre on mode 1 (occ 0)
    assert_eq!(src.occ_fac_square(&conn), 2);
    assert!((src.occ_fac(&conn) - 2f64.sqrt()).abs() < 1e-12);
}

#[test]
fn corrected_factor_discounts_common_mode_annihilations() {
    let src = onv(&[3, 2]);
    let dst = onv(&[2, 2]);
    let mut conn = BosConn::new(2);
    let mut com = BosOps::new(2);
    conn.connect_with_com(&src, &dst, &mut com).unwrap();
    assert_eq!(com.pairs().len(), 1);
    assert_eq!(com.pairs()[0].imode, 1);

    // plain factor on mode 0 is 3; mode-1 common pairs see full occ 2
    assert_eq!(src.occ_fac_square(&conn), 3);
    assert_eq!(src.occ_fac_square_com(&com), 4);

    // a common pair on the annihilated mode must see the residual occ
    let mut com_on_ann = BosOps::new(2);
    com_on_ann.add(0, 1);
    assert_eq!(src.occ_fac_square_corrected(&conn, &com_on_ann), 3 * 4);
    // occ 3, one annihilated, pair sees 2: 3 * 2^2 = 12
}

#[test]
fn corrected_factor_is_zero_on_over_annihilation() {
    let src = onv(&[1]);
    // a connection annihilating three bosons, applied to a singly occupied mode
    let mut conn = BosConn::new(1);
    conn.connect(&onv(&[3]), &onv(&[0])).unwrap();
    let com = BosOps::new(1);
    assert_eq!(src.occ_fac_square_corrected(&conn, &com), 0);
    assert!(!conn.respects_occ_range(&src));
}

#[test]
fn factor_wrappers_match_their_squared_counterparts() {
    let src = onv(&[3, 2]);
    let dst = onv(&[2, 2]);
    let mut conn = BosConn::new(2);
    let mut com = BosOps::new(2);
    conn.connect_with_com(&src, &dst, &mut com).unwrap();
    // mode-1 common pairs square to 4
    assert!((src.occ_fac_com(&com) - 2.0).abs() < 1e-12);

    let mut com_on_ann = BosOps::new(2);
    com_on_ann.add(0, 1);
    assert!((src.occ_fac_corrected(&conn, &com_on_ann) - 12f64.sqrt()).abs() < 1e-12);
}

#[test]
fn occupation_edits_respect_the_cutoff() {
    let mut v = onv(&[2, 1]);
    assert_eq!(v.nboson(), 3);
    v.set_occ(1, 5).unwrap();
    assert_eq!(v.occ(1), 5);
    assert_eq!(v.nboson(), 7);
    let err = v.set_occ(0, 9).unwrap_err();
    assert_eq!(err.info().code, "bos-occ-cutoff");
    assert_eq!(v.occ(0), 2);
}

#[test]
fn differing_basis_descriptors_are_rejected() {
    // same extent, different cutoff
    let src = BosOnv::from_occ(BosBasis::new(2, 4), &[1, 0]).unwrap();
    let dst = BosOnv::from_occ(BosBasis::new(2, 8), &[1, 0]).unwrap();
    let mut conn = BosConn::new(2);
    let err = conn.connect(&src, &dst).unwrap_err();
    assert_eq!(err.info().code, "bos-extent-mismatch");
}

#[test]
fn connect_apply_round_trip_and_common_modes() {
    let src = onv(&[2, 1, 0, 4]);
    let dst = onv(&[2, 0, 1, 4]);
    let mut conn = BosConn::new(4);
    let mut com = BosOps::new(4);
    conn.connect_with_com(&src, &dst, &mut com).unwrap();
    assert_eq!(conn.ann().pairs(), &[mbae_basis::BosOpPair { imode: 1, nop: 1 }]);
    assert_eq!(conn.cre().pairs(), &[mbae_basis::BosOpPair { imode: 2, nop: 1 }]);
    // modes 0 and 3 are common with their full occupations
    assert_eq!(com.expanded(), vec![0, 0, 3, 3, 3, 3]);

    let mut applied = BosOnv::zero(src.basis());
    conn.apply(&src, &mut applied);
    assert_eq!(applied, dst);

    let mut residual = BosOps::new(4);
    conn.apply_com(&src, &mut residual);
    assert_eq!(residual.expanded(), vec![0, 0, 3, 3, 3, 3]);
}

#[test]
fn occ_range_check_rejects_cutoff_violation() {
    let basis = BosBasis::new(2, 2);
    let src = BosOnv::from_occ(basis, &[2, 0]).unwrap();
    let above = BosOnv::from_occ(basis, &[2, 2]).unwrap();
    let mut conn = BosConn::new(2);
    conn.connect(&BosOnv::from_occ(basis, &[2, 1]).unwrap(), &above).unwrap();
    // creating on mode 1 from occ 0 is fine, but from occ 2 exceeds the cutoff
    assert!(conn.respects_occ_range(&src));
    let full = BosOnv::from_occ(basis, &[2, 2]).unwrap();
    assert!(!conn.respects_occ_range(&full));
}

#[test]
fn occupancy_construction_is_validated() {
    let basis = BosBasis::new(2, 4);
    let err = BosOnv::from_occ(basis, &[1, 2, 3]).unwrap_err();
    assert_eq!(err.info().code, "bos-extent-mismatch");
    let err = BosOnv::from_occ(basis, &[5, 0]).unwrap_err();
    assert_eq!(err.info().code, "bos-occ-cutoff");
}
