pub(crate) mod virtual_list;
