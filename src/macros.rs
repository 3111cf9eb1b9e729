macro_rules! all_the_tuples {
    ($name:ident) => {
        $name!([]);
        $name!([A1]);
        $name!([A1, A2]);
        $name!([A1, A2, A3]);
        $name!([A1, A2, A3, A4]);
        $name!([A1, A2, A3, A4, A5]);
        $name!([A1, A2, A3, A4, A5, A6]);
        $name!([A1, A2, A3, A4, A5, A6, A7]);
        $name!([A1, A2, A3, A4, A5, A6, A7, A8]);
    };
}
