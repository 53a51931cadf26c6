use mbae_basis::{FrmBasis, FrmConn, FrmOnv, FrmOps};
use mbae_core::OpSig;
use mbae_rdm::promoter::combinatorial;
use mbae_rdm::{FermionPromoter, RdmIndsBuf};

fn double_conn() -> (FrmOnv, FrmConn, FrmOps) {
    let basis = FrmBasis::new(5);
    let src = FrmOnv::from_occ(basis, &[1, 3, 4, 6, 7, 9]).unwrap();
    let dst = FrmOnv::from_occ(basis, &[1, 2, 4, 6, 8, 9]).unwrap();
    let mut conn = FrmConn::new(basis);
    let mut com = FrmOps::new(basis.nspinorb());
    conn.connect_with_com(&src, &dst, &mut com).unwrap();
    (src, conn, com)
}

#[test]
fn zero_insertions_is_the_identity_for_every_common_size() {
    let (_, conn, full_com) = double_conn();
    for ncom in 0..=full_com.len() {
        let promoter = FermionPromoter::new(ncom, 0).unwrap();
        assert_eq!(promoter.ncomb(), 1);
        let mut com = FrmOps::new(20);
        com.set_from(&full_com.as_slice()[..ncom]);
        let mut inds = RdmIndsBuf::new(OpSig::frm(2).unwrap());
        let sign = promoter.apply(0, &conn, &com, &mut inds);
        assert!(!sign);
        assert_eq!(inds.frm_cre(), &[2, 8]);
        assert_eq!(inds.frm_ann(), &[3, 7]);
    }
}

#[test]
fn combination_table_enumerates_all_subsets_in_order() {
    for ncom in 0..7usize {
        for nins in 0..=ncom {
            let promoter = FermionPromoter::new(ncom, nins).unwrap();
            assert_eq!(promoter.ncomb(), combinatorial(ncom, nins));
            let mut seen = Vec::new();
            for icomb in 0..promoter.ncomb() {
                let comb = promoter.comb(icomb).to_vec();
                assert_eq!(comb.len(), nins);
                assert!(comb.windows(2).all(|w| w[0] < w[1]), "combination not sorted");
                assert!(comb.iter().all(|&i| (i as usize) < ncom));
                seen.push(comb);
            }
            let mut sorted = seen.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), seen.len(), "duplicate combination emitted");
            assert_eq!(sorted, seen, "combinations not in lexicographic order");
        }
    }
}

#[test]
fn overfull_insertion_is_rejected() {
    let err = FermionPromoter::new(2, 3).unwrap_err();
    assert_eq!(err.info().code, "promoter-overfull");
}

#[test]
fn diagonal_promotion_reproduces_the_chosen_spectators_without_sign() {
    let basis = FrmBasis::new(5);
    let src = FrmOnv::from_occ(basis, &[1, 3, 4, 6, 7, 9]).unwrap();
    let mut conn = FrmConn::new(basis);
    let mut com = FrmOps::new(basis.nspinorb());
    conn.connect_with_com(&src, &src, &mut com).unwrap();

    let promoter = FermionPromoter::new(com.len(), 2).unwrap();
    let mut inds = RdmIndsBuf::new(OpSig::frm(2).unwrap());
    for icomb in 0..promoter.ncomb() {
        let sign = promoter.apply(icomb, &conn, &com, &mut inds);
        assert!(!sign, "diagonal promotion must carry no sign");
        let comb = promoter.comb(icomb);
        let expect: Vec<u32> = comb.iter().map(|&pos| com.get(pos as usize) as u32).collect();
        assert_eq!(inds.frm_cre(), expect.as_slice());
        assert_eq!(inds.frm_ann(), expect.as_slice());
    }
}

#[test]
fn single_excitation_promotion_signs_track_the_insertion_point() {
    // 3 -> 8 with spectators {1, 4, 6, 7, 9}: inserting a spectator between
    // the annihilated and created index costs one exchange on one side only
    let basis = FrmBasis::new(5);
    let src = FrmOnv::from_occ(basis, &[1, 3, 4, 6, 7, 9]).unwrap();
    let dst = FrmOnv::from_occ(basis, &[1, 4, 6, 7, 8, 9]).unwrap();
    let mut conn = FrmConn::new(basis);
    let mut com = FrmOps::new(basis.nspinorb());
    conn.connect_with_com(&src, &dst, &mut com).unwrap();
    assert_eq!(com.as_slice(), &[1, 4, 6, 7, 9]);

    let promoter = FermionPromoter::new(5, 1).unwrap();
    let mut inds = RdmIndsBuf::new(OpSig::frm(2).unwrap());

    let expect: &[(bool, [u32; 2], [u32; 2])] = &[
        (false, [1, 8], [1, 3]),
        (true, [4, 8], [3, 4]),
        (true, [6, 8], [3, 6]),
        (true, [7, 8], [3, 7]),
        (false, [8, 9], [3, 9]),
    ];
    for (icomb, &(sign, cre, ann)) in expect.iter().enumerate() {
        assert_eq!(promoter.apply(icomb, &conn, &com, &mut inds), sign, "icomb {icomb}");
        assert_eq!(inds.frm_cre(), &cre);
        assert_eq!(inds.frm_ann(), &ann);
        assert!(inds.is_ordered());
    }
}
