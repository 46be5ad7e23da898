use itertools::Itertools;
use num_traits::Inv;

use crate::permutation::Permutation;

#[test]
fn test_permutation_invalid_image() {
    assert!(Permutation::from_image(&[0, 0, 1]).is_err());
    assert!(Permutation::from_image(&[0, 3, 1]).is_err());
    assert!(Permutation::from_image(&[]).unwrap().image().is_empty());
    assert_eq!(
        Permutation::from_image(&[3, 2, 1, 0, 4]).unwrap().image(),
        &vec![3, 2, 1, 0, 4]
    );
}

#[test]
fn test_permutation_inverse() {
    let p_12340 = Permutation::from_image(&[1, 2, 3, 4, 0]).unwrap();
    assert_eq!((&p_12340).inv().image(), &vec![4, 0, 1, 2, 3]);

    let rank = 6;
    for image in (0..rank).permutations(rank) {
        let perm = Permutation::from_image(&image).unwrap();
        let inv = (&perm).inv();
        assert!((0..rank).all(|i| inv.image()[perm.image()[i]] == i));
        assert!((0..rank).all(|i| perm.image()[inv.image()[i]] == i));
        assert_eq!(inv.inv(), perm);
    }
}
